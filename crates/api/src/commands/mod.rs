//! Bot commands on top of the application context

mod roster;
mod tournaments;

pub use roster::*;
pub use tournaments::*;
