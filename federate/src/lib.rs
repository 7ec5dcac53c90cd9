//! # Fedgate Federate
//! Drives a single HLA federate through its lifecycle (join, capability
//! negotiation, declaration, synchronization barriers, the time-stepped main
//! loop and resignation) on behalf of a hosted `FederateApplication`, over any
//! runtime that implements `RtiAmbassador`.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod shared {
    pub use fedgate_shared::{
        decode_value, encode_value, ClassDeclaration, ClassId, ClassKind, ClassType,
        EncodedFields, FederateHandle, FieldDeclaration, FieldHandle, FieldMap, FieldType,
        FieldValues, Interaction, InteractionClassHandle, LogicalTime, ModelTree,
        ObjectClassHandle, ObjectInstanceHandle, ObjectModelError, ObjectModelIndex,
        ObjectModelLoader, ObjectReflection, Sharing,
    };
}

mod ambassador;
mod config;
mod error;
mod rti;
mod session;

pub use ambassador::{CallbackError, DiscoveredInstance, FederateAmbassador, FederateCallbacks};
pub use config::{ConfigError, FederateConfig};
pub use error::{FaultKind, FederateError};
pub use rti::{Capability, RtiAmbassador, RtiError};
pub use session::{
    C2wBookkeeping, FederateApplication, FederateSession, InteractionRewriter, RewriteContext,
    SessionState, C2W_INTERACTION_ROOT, READY_TO_POPULATE, READY_TO_RESIGN, READY_TO_RUN,
    SIMULATION_END_INTERACTION,
};
