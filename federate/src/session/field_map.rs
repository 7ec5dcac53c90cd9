use log::{debug, warn};

use fedgate_shared::{
    encode_value, ClassType, EncodedFields, FieldHandle, FieldMap, InteractionClassHandle,
    ObjectClassHandle,
};

use crate::{FederateError, RtiAmbassador};

/// Translates outgoing parameter names to runtime handles.
///
/// Names the class does not declare (locally or by inheritance) are skipped.
pub(crate) fn encode_parameters(
    rti: &dyn RtiAmbassador,
    class: &ClassType,
    class_handle: InteractionClassHandle,
    fields: &FieldMap,
) -> Result<EncodedFields, FederateError> {
    let mut encoded = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        if !class.has_field(name) {
            warn!(
                "Skipping parameter '{}': not declared by interaction '{}'",
                name,
                class.full_path()
            );
            continue;
        }
        let handle = rti
            .parameter_handle(class_handle, name)
            .map_err(|error| FederateError::from_rti("resolve parameter handle", error))?;
        encoded.push((handle, encode_value(value)));
    }
    Ok(encoded)
}

/// Translates outgoing attribute names to runtime handles.
///
/// Only attributes this federate publishes are sent.
pub(crate) fn encode_attributes(
    rti: &dyn RtiAmbassador,
    class: &ClassType,
    class_handle: ObjectClassHandle,
    fields: &FieldMap,
) -> Result<EncodedFields, FederateError> {
    let mut encoded = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        match class.field(name) {
            Some(field) if field.is_published() => {}
            Some(_) => {
                warn!(
                    "Skipping attribute '{}' of '{}': not published",
                    name,
                    class.full_path()
                );
                continue;
            }
            None => {
                warn!(
                    "Skipping attribute '{}': not declared by object class '{}'",
                    name,
                    class.full_path()
                );
                continue;
            }
        }
        let handle = rti
            .attribute_handle(class_handle, name)
            .map_err(|error| FederateError::from_rti("resolve attribute handle", error))?;
        encoded.push((handle, encode_value(value)));
    }
    Ok(encoded)
}

pub(crate) fn decode_parameters(
    rti: &dyn RtiAmbassador,
    class: &ClassType,
    class_handle: InteractionClassHandle,
    values: &[(FieldHandle, String)],
) -> Result<FieldMap, FederateError> {
    let mut fields = FieldMap::new();
    for (handle, value) in values {
        let name = rti
            .parameter_name(class_handle, *handle)
            .map_err(|error| FederateError::from_rti("resolve parameter name", error))?;
        if class.has_field(&name) {
            fields.insert(name, value.clone());
        } else {
            debug!(
                "Dropping parameter '{}' of '{}': not in the object model",
                name,
                class.full_path()
            );
        }
    }
    Ok(fields)
}

pub(crate) fn decode_attributes(
    rti: &dyn RtiAmbassador,
    class: &ClassType,
    class_handle: ObjectClassHandle,
    values: &[(FieldHandle, String)],
) -> Result<FieldMap, FederateError> {
    let mut fields = FieldMap::new();
    for (handle, value) in values {
        let name = rti
            .attribute_name(class_handle, *handle)
            .map_err(|error| FederateError::from_rti("resolve attribute name", error))?;
        if class.has_field(&name) {
            fields.insert(name, value.clone());
        } else {
            debug!(
                "Dropping attribute '{}' of '{}': not in the object model",
                name,
                class.full_path()
            );
        }
    }
    Ok(fields)
}

/// Resolves attribute handles for a set of declared fields, for declarations
pub(crate) fn attribute_handles<'a>(
    rti: &dyn RtiAmbassador,
    class_handle: ObjectClassHandle,
    names: impl Iterator<Item = &'a str>,
) -> Result<Vec<FieldHandle>, FederateError> {
    names
        .map(|name| {
            rti.attribute_handle(class_handle, name)
                .map_err(|error| FederateError::from_rti("resolve attribute handle", error))
        })
        .collect()
}
