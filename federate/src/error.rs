use thiserror::Error;

use fedgate_shared::{LogicalTime, ObjectInstanceHandle, ObjectModelError};

use crate::{CallbackError, ConfigError, RtiError, SessionState};

/// Coarse classification of a `FederateError`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// The federation never became available within the configured join attempts
    Transient,
    /// The runtime contradicted something it told this federate moments earlier
    ContractViolation,
    /// The runtime does not implement the requested service
    UnsupportedService,
    /// The session was used in a way its lifecycle does not allow
    Misuse,
    /// Configuration or object model was rejected before the session started
    Configuration,
    /// The hosted application reported a failure from one of its callbacks
    Application,
}

#[derive(Debug, Error)]
pub enum FederateError {
    #[error("Could not join federation '{federation}' after {attempts} attempts: {last_error}")]
    JoinAttemptsExhausted {
        federation: String,
        attempts: u32,
        last_error: RtiError,
    },

    #[error("Runtime refused to join federation '{federation}': {source}")]
    JoinRejected {
        federation: String,
        #[source]
        source: RtiError,
    },

    #[error("Runtime contract violated during {operation}: {source}")]
    RuntimeContractViolated {
        operation: &'static str,
        #[source]
        source: RtiError,
    },

    #[error("Service '{service}' is not supported by the runtime")]
    UnsupportedService { service: &'static str },

    #[error("Cannot {operation} while the session is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("The object model has no {kind} class '{path}'")]
    NotInObjectModel { kind: &'static str, path: String },

    #[error("Class '{path}' is not published by this federate")]
    NotPublished { path: String },

    #[error("Timestamp {requested} is earlier than the earliest sendable time {earliest}")]
    TimestampTooEarly {
        requested: LogicalTime,
        earliest: LogicalTime,
    },

    #[error("Object instance {instance} was not registered by this federate")]
    UnknownObjectInstance { instance: ObjectInstanceHandle },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ObjectModel(#[from] ObjectModelError),

    #[error("Application error: {message}")]
    Application { message: String },
}

impl FederateError {
    pub fn application(message: impl Into<String>) -> Self {
        FederateError::Application {
            message: message.into(),
        }
    }

    /// Collapses a runtime condition raised by `operation` into the session taxonomy.
    ///
    /// Join failures are classified by the join loop itself and never reach here.
    pub fn from_rti(operation: &'static str, error: RtiError) -> Self {
        match error {
            RtiError::Unsupported { service } => FederateError::UnsupportedService { service },
            error => FederateError::RuntimeContractViolated {
                operation,
                source: error,
            },
        }
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            FederateError::JoinAttemptsExhausted { .. } => FaultKind::Transient,
            FederateError::RuntimeContractViolated { .. } => FaultKind::ContractViolation,
            FederateError::UnsupportedService { .. } => FaultKind::UnsupportedService,
            FederateError::JoinRejected { .. }
            | FederateError::InvalidState { .. }
            | FederateError::NotInObjectModel { .. }
            | FederateError::NotPublished { .. }
            | FederateError::TimestampTooEarly { .. }
            | FederateError::UnknownObjectInstance { .. } => FaultKind::Misuse,
            FederateError::Config(_) | FederateError::ObjectModel(_) => FaultKind::Configuration,
            FederateError::Application { .. } => FaultKind::Application,
        }
    }

    /// The callback failure a runtime passed back through `tick`, if any
    pub fn callback_error(&self) -> Option<&CallbackError> {
        match self {
            FederateError::RuntimeContractViolated {
                source: RtiError::FederateInternal(error),
                ..
            } => Some(error),
            _ => None,
        }
    }
}
