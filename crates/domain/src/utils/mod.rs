//! Serde helpers shared by the domain models

pub mod expiry_format;
pub mod lenient;
