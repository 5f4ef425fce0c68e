/// Application services shared by the use cases
pub mod identifier_resolver;
pub mod property_store;
pub mod repository_patterns;
pub mod state_tracker;

pub use identifier_resolver::IdentifierResolver;
pub use property_store::PropertyStore;
pub use repository_patterns::configured_patterns;
pub use state_tracker::InspectionStateTracker;
