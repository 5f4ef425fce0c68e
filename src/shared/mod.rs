/// Shared kernel - error types, the crate-wide Result alias and file guards
pub mod error;
pub mod result;
pub mod security;

pub use error::{ExitCode, InspectionError};
pub use result::Result;
