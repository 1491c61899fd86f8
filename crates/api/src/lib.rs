//! RosterLink application layer
//!
//! Wires the infrastructure adapters into an [`AppContext`] and exposes the
//! bot's commands on top of it. The `rosterlink` binary is a thin command
//! line front end over [`commands`].

pub mod commands;
pub mod context;
pub mod utils;

pub use context::AppContext;
pub use utils::logging::{error_label, init_tracing, init_tracing_with, log_command_execution, LogFormat};
