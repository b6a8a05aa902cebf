//! Error type shared by the Quench crates

use thiserror::Error;

/// Failures surfaced while building or driving a simulation
#[derive(Debug, Error)]
pub enum QuenchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for Quench operations
pub type Result<T> = std::result::Result<T, QuenchError>;

impl QuenchError {
    /// Shorthand for a `ValueOutOfRange` on an `f32` field.
    pub fn out_of_range(field: impl Into<String>, min: f32, max: f32, value: f32) -> Self {
        QuenchError::ValueOutOfRange {
            field: field.into(),
            min: min as f64,
            max: max as f64,
            value: value as f64,
        }
    }
}

impl From<toml::de::Error> for QuenchError {
    fn from(err: toml::de::Error) -> Self {
        QuenchError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for QuenchError {
    fn from(err: toml::ser::Error) -> Self {
        QuenchError::TomlSerError(err.to_string())
    }
}
