use crate::{
    envelope::{decode_fields, EncodedFields, FieldValues},
    FieldHandle, InteractionClassHandle, LogicalTime,
};

/// Snapshot of a single received interaction.
///
/// Field handles are left unresolved; names are looked up when the session
/// drains the envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
    class: InteractionClassHandle,
    fields: FieldValues,
    timestamp: Option<LogicalTime>,
}

impl Interaction {
    pub fn new(
        class: InteractionClassHandle,
        fields: FieldValues,
        timestamp: Option<LogicalTime>,
    ) -> Self {
        Self {
            class,
            fields,
            timestamp,
        }
    }

    pub fn decode(
        class: InteractionClassHandle,
        encoded: EncodedFields,
        timestamp: Option<LogicalTime>,
    ) -> Self {
        Self::new(class, decode_fields(encoded), timestamp)
    }

    pub fn class(&self) -> InteractionClassHandle {
        self.class
    }

    pub fn fields(&self) -> &[(FieldHandle, String)] {
        &self.fields
    }

    /// `Some` for timestamp-order deliveries
    pub fn timestamp(&self) -> Option<LogicalTime> {
        self.timestamp
    }
}
