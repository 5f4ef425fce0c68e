/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with the host repository manager and the scanning service.
pub mod repository_store;
pub mod scan_service;

pub use repository_store::{ItemInfo, LayoutInfo, RepositoryStore};
pub use scan_service::{
    ComponentVersionStatus, NotificationContent, NotificationRecord, ScanService, UserRef,
};
