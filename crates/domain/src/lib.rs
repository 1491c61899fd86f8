//! # RosterLink Domain
//!
//! Business domain types and models for RosterLink.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - The durable credential file model and runtime settings
//! - Roster records mirrored between Toornament and the local cache
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other RosterLink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
