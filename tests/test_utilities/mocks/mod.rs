/// Mock implementations for testing
mod mock_repository_store;
mod mock_scan_service;

pub use mock_repository_store::MockRepositoryStore;
pub use mock_scan_service::MockScanService;
