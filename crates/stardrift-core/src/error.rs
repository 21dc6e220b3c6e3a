//! Error types for Stardrift

use thiserror::Error;

/// The main error type for Stardrift operations
#[derive(Debug, Error)]
pub enum StardriftError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Stardrift operations
pub type Result<T> = std::result::Result<T, StardriftError>;

impl From<toml::de::Error> for StardriftError {
    fn from(err: toml::de::Error) -> Self {
        StardriftError::TomlParseError(err.to_string())
    }
}
