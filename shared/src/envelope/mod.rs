use crate::FieldHandle;

pub mod interaction;
pub mod object_reflection;
pub mod payload;

/// Decoded (field handle, value) pairs, in delivery order
pub type FieldValues = Vec<(FieldHandle, String)>;

/// Raw (field handle, payload) pairs as handed to or from the runtime
pub type EncodedFields = Vec<(FieldHandle, Vec<u8>)>;

pub(crate) fn decode_fields(encoded: EncodedFields) -> FieldValues {
    encoded
        .into_iter()
        .map(|(handle, bytes)| (handle, payload::decode_value(&bytes)))
        .collect()
}
