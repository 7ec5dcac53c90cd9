use std::fmt;

use thiserror::Error;

use crate::CallbackError;

/// A runtime service that can be switched on once per federate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    AsynchronousDelivery,
    TimeConstrained,
    TimeRegulation,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::AsynchronousDelivery => "asynchronous delivery",
            Capability::TimeConstrained => "time constrained",
            Capability::TimeRegulation => "time regulation",
        };
        f.write_str(name)
    }
}

/// Conditions a runtime reports from its session API.
///
/// A runtime implementation maps its own failure types onto these; the
/// session then collapses them into a `FederateError` at each call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RtiError {
    /// The federation does not exist (yet) or is not accepting joins
    #[error("Federation '{federation}' is not available")]
    FederationNotAvailable { federation: String },

    /// The runtime could not be reached
    #[error("Could not connect to the runtime: {reason}")]
    ConnectionFailed { reason: String },

    /// A federate with the requested name already joined
    #[error("Federate name '{name}' is already in use")]
    FederateNameInUse { name: String },

    #[error("Operation requires a joined federate")]
    NotJoined,

    #[error("Capability '{0}' is already enabled")]
    AlreadyEnabled(Capability),

    #[error("Capability '{0}' is already being enabled")]
    EnablePending(Capability),

    /// A class, parameter or attribute name is not defined in the federation's object model
    #[error("Name '{name}' is not defined")]
    NameNotFound { name: String },

    /// A handle does not refer to anything the runtime knows
    #[error("Handle {handle} is not known: {context}")]
    HandleNotKnown { handle: u32, context: &'static str },

    #[error("Class '{class}' has not been published")]
    NotPublished { class: String },

    #[error("Logical time {time} is invalid: {reason}")]
    InvalidLogicalTime { time: f64, reason: &'static str },

    #[error("Synchronization point '{label}' is not announced")]
    SyncPointNotAnnounced { label: String },

    /// A time advance was requested while another is still pending
    #[error("A time advance is already in progress")]
    TimeAdvanceAlreadyInProgress,

    /// The runtime does not implement this service
    #[error("Service '{service}' is not supported by this runtime")]
    Unsupported { service: &'static str },

    /// A federate callback refused a notification while the runtime was delivering it
    #[error("Federate callback failed: {0}")]
    FederateInternal(#[from] CallbackError),

    #[error("Runtime internal error: {reason}")]
    Internal { reason: String },
}

impl RtiError {
    /// Whether a join that failed with this condition may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RtiError::FederationNotAvailable { .. } | RtiError::ConnectionFailed { .. }
        )
    }
}
