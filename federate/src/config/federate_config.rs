use std::{path::PathBuf, time::Duration};

use fedgate_shared::LogicalTime;

use crate::ConfigError;

/// Contains Config properties which will be used by a `FederateSession`.
///
/// Every field is required; when loaded from a file, a missing field is a
/// parse error.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "toml_config", derive(serde::Deserialize))]
#[cfg_attr(feature = "toml_config", serde(deny_unknown_fields))]
pub struct FederateConfig {
    /// Name this federate joins under
    pub federate_name: String,
    /// Federation (execution) to join
    pub federation_name: String,
    /// Location of the federation object model document
    pub object_model_path: PathBuf,
    /// How many times to attempt joining before giving up
    pub max_join_attempts: u32,
    /// Delay between join attempts, in milliseconds
    pub join_retry_delay_ms: u64,
    /// Whether the federate joins a federation that is already running.
    /// Late joiners skip every synchronization barrier.
    pub late_joiner: bool,
    /// Minimum offset from the current logical time for timestamped sends
    pub lookahead: LogicalTime,
    /// Logical time between consecutive steps
    pub step_size: LogicalTime,
}

impl FederateConfig {
    pub fn join_retry_delay(&self) -> Duration {
        Duration::from_millis(self.join_retry_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.federate_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "federate_name",
                reason: "must not be empty",
            });
        }
        if self.federation_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "federation_name",
                reason: "must not be empty",
            });
        }
        if self.max_join_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max_join_attempts",
                reason: "must allow at least one attempt",
            });
        }
        if !self.lookahead.is_finite() || self.lookahead < 0.0 {
            return Err(ConfigError::Invalid {
                field: "lookahead",
                reason: "must be a finite, non-negative time",
            });
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "step_size",
                reason: "must be a finite, positive time",
            });
        }
        Ok(())
    }
}
