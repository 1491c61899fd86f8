//! Domain types and models

pub mod chat;
pub mod roster;
pub mod tournament;

pub use chat::*;
pub use roster::*;
pub use tournament::*;
