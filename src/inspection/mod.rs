/// Inspection domain - value types and pure services
///
/// Nothing in this module performs I/O. The application layer feeds it data
/// read through the ports and persists what it produces.
pub mod domain;
pub mod services;
