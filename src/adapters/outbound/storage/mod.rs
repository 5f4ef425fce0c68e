/// Storage adapters standing in for the host repository manager
mod in_memory_store;

pub use in_memory_store::InMemoryRepositoryStore;
