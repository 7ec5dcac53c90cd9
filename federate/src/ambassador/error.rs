use thiserror::Error;

use fedgate_shared::ObjectInstanceHandle;

/// Errors a federate callback hands back to the runtime delivering it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// A reflect or remove notice named an instance that was never discovered
    #[error("Object instance {instance} is not known to this federate")]
    ObjectInstanceNotKnown { instance: ObjectInstanceHandle },

    /// A discovery notice reused the handle of a live instance. Runtimes
    /// guarantee handle uniqueness, so this is a protocol violation.
    #[error("Object instance {instance} discovered twice (already known as '{existing_name}')")]
    DuplicateDiscovery {
        instance: ObjectInstanceHandle,
        existing_name: String,
    },
}
