use crate::{
    envelope::{decode_fields, EncodedFields, FieldValues},
    FieldHandle, LogicalTime, ObjectClassHandle, ObjectInstanceHandle,
};

/// Snapshot of a single attribute reflection for a discovered instance
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectReflection {
    instance: ObjectInstanceHandle,
    class: ObjectClassHandle,
    instance_name: String,
    fields: FieldValues,
    timestamp: Option<LogicalTime>,
}

impl ObjectReflection {
    pub fn new(
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        instance_name: String,
        fields: FieldValues,
        timestamp: Option<LogicalTime>,
    ) -> Self {
        Self {
            instance,
            class,
            instance_name,
            fields,
            timestamp,
        }
    }

    pub fn decode(
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        instance_name: String,
        encoded: EncodedFields,
        timestamp: Option<LogicalTime>,
    ) -> Self {
        Self::new(
            instance,
            class,
            instance_name,
            decode_fields(encoded),
            timestamp,
        )
    }

    pub fn instance(&self) -> ObjectInstanceHandle {
        self.instance
    }

    pub fn class(&self) -> ObjectClassHandle {
        self.class
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn fields(&self) -> &[(FieldHandle, String)] {
        &self.fields
    }

    pub fn timestamp(&self) -> Option<LogicalTime> {
        self.timestamp
    }
}
