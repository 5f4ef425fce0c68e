/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (CLI, schedulers,
/// storage-event hooks) use to interact with the application core.
pub mod inspection_port;

pub use inspection_port::InspectionPort;
