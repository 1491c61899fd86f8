//! Macro for implementing Display and FromStr for setting enums
//!
//! Settings such as the cache backend are read from environment variables as
//! strings. This macro provides a single implementation for both Display and
//! FromStr so the string form stays consistent in both directions.
//!
//! # Example
//!
//! ```rust
//! use rosterlink_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LogFormat {
//!     Pretty,
//!     Json,
//! }
//!
//! impl_domain_enum_conversions!(LogFormat {
//!     Pretty => "pretty",
//!     Json => "json",
//! });
//!
//! assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
//! ```

/// Implements Display and FromStr traits for simple enums
///
/// - Display writes the mapped lowercase string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
