use thiserror::Error;

/// Errors raised while loading or validating a `FederateConfig`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration source could not be read
    #[error("Failed to read configuration from '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The configuration source was malformed or missed a required field
    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },

    /// A field was present but its value cannot be used
    #[error("Invalid configuration field '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
