//! Error types for the pantry_core library.

use rust_decimal::Decimal;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pantry_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Expiration date string is not in `YYYY-MM-DD` form
    #[error("invalid expiration date {value:?}, expected YYYY-MM-DD: {source}")]
    DateFormat {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// No token of a note could be read as a quantity
    #[error("cannot parse this line into a good entry: {0:?}")]
    UnparseableNote(String),

    /// Quantity rejected by the configured quantity policy
    #[error("quantity {quantity} for {name:?} must not be negative")]
    InvalidQuantity { name: String, quantity: Decimal },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
