/// Network adapters for the remote scanning service
mod bom_service_client;
mod caching_scan_service;

pub use bom_service_client::BomServiceClient;
pub use caching_scan_service::CachingScanService;
