//! Tournament roster synchronization

pub mod ports;
pub mod service;

pub use service::RosterSyncService;
