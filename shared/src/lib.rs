//! # Fedgate Shared
//! Common functionality shared between the fedgate crates: runtime handle
//! types, the federation object model index, and the decoded event
//! envelopes delivered by the runtime.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod envelope;
mod object_model;
mod types;

pub use envelope::{
    interaction::Interaction,
    object_reflection::ObjectReflection,
    payload::{decode_value, encode_value},
    EncodedFields, FieldValues,
};
pub use object_model::{
    error::ObjectModelError,
    loader::ObjectModelLoader,
    model_tree::{ClassDeclaration, ClassId, ClassKind, FieldDeclaration, ModelTree},
    object_model_index::{ClassType, FieldType, ObjectModelIndex},
    sharing::Sharing,
};
pub use types::{
    FederateHandle, FieldHandle, FieldMap, InteractionClassHandle, LogicalTime,
    ObjectClassHandle, ObjectInstanceHandle,
};
