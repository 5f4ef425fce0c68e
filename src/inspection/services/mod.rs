pub mod aggregate_book;
pub mod artifact_patterns;

pub use aggregate_book::AggregateBook;
pub use artifact_patterns::ArtifactPatterns;
