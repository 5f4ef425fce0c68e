/// Application layer - Use cases and DTOs
///
/// This layer contains the application logic that orchestrates
/// domain services and coordinates with infrastructure through ports.
pub mod dto;
pub mod inspection_service;
pub mod scheduler;
pub mod services;
pub mod use_cases;

pub use inspection_service::InspectionService;
pub use scheduler::{ReconciliationScheduler, SweepKind};
