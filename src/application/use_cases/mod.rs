/// Use cases module containing application business logic orchestration
mod initialize_repository;
mod inspect_delta;
mod reconcile_notifications;
mod storage_events;
mod update_metadata;

#[cfg(test)]
pub(crate) mod test_support;

pub use initialize_repository::InitializeRepositoryUseCase;
pub use inspect_delta::InspectDeltaUseCase;
pub use reconcile_notifications::ReconcileNotificationsUseCase;
pub use storage_events::StorageEventsUseCase;
pub use update_metadata::UpdateMetadataUseCase;
