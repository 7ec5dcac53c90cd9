use fedgate_shared::{
    EncodedFields, FederateHandle, FieldHandle, InteractionClassHandle, LogicalTime,
    ObjectClassHandle, ObjectInstanceHandle,
};

use crate::{FederateCallbacks, RtiError};

/// The runtime's session API, as consumed by `FederateSession`.
///
/// Implementations deliver callbacks only from within `tick`, through the
/// `FederateCallbacks` they are handed there. No other method may invoke a
/// callback. There is no `Send` bound: a session and its runtime stay on the
/// thread that created them.
pub trait RtiAmbassador {
    // Federation membership

    fn join_federation(
        &mut self,
        federate_name: &str,
        federation_name: &str,
    ) -> Result<FederateHandle, RtiError>;

    fn resign_federation(&mut self) -> Result<(), RtiError>;

    // Capabilities

    fn enable_asynchronous_delivery(&mut self) -> Result<(), RtiError>;

    /// Confirmed later by `FederateCallbacks::time_constrained_enabled`
    fn enable_time_constrained(&mut self) -> Result<(), RtiError>;

    /// Confirmed later by `FederateCallbacks::time_regulation_enabled`
    fn enable_time_regulation(&mut self, lookahead: LogicalTime) -> Result<(), RtiError>;

    // Declarations

    fn publish_interaction_class(&mut self, class: InteractionClassHandle)
        -> Result<(), RtiError>;

    fn subscribe_interaction_class(
        &mut self,
        class: InteractionClassHandle,
    ) -> Result<(), RtiError>;

    fn publish_object_class_attributes(
        &mut self,
        class: ObjectClassHandle,
        attributes: &[FieldHandle],
    ) -> Result<(), RtiError>;

    fn subscribe_object_class_attributes(
        &mut self,
        class: ObjectClassHandle,
        attributes: &[FieldHandle],
    ) -> Result<(), RtiError>;

    // Handle and name lookups

    fn interaction_class_handle(&self, name: &str) -> Result<InteractionClassHandle, RtiError>;

    fn interaction_class_name(&self, class: InteractionClassHandle) -> Result<String, RtiError>;

    fn parameter_handle(
        &self,
        class: InteractionClassHandle,
        name: &str,
    ) -> Result<FieldHandle, RtiError>;

    fn parameter_name(
        &self,
        class: InteractionClassHandle,
        parameter: FieldHandle,
    ) -> Result<String, RtiError>;

    fn object_class_handle(&self, name: &str) -> Result<ObjectClassHandle, RtiError>;

    fn object_class_name(&self, class: ObjectClassHandle) -> Result<String, RtiError>;

    fn attribute_handle(
        &self,
        class: ObjectClassHandle,
        name: &str,
    ) -> Result<FieldHandle, RtiError>;

    fn attribute_name(
        &self,
        class: ObjectClassHandle,
        attribute: FieldHandle,
    ) -> Result<String, RtiError>;

    // Objects

    fn register_object_instance(
        &mut self,
        class: ObjectClassHandle,
    ) -> Result<ObjectInstanceHandle, RtiError>;

    fn delete_object_instance(&mut self, instance: ObjectInstanceHandle) -> Result<(), RtiError>;

    fn update_attribute_values(
        &mut self,
        instance: ObjectInstanceHandle,
        attributes: EncodedFields,
        timestamp: Option<LogicalTime>,
    ) -> Result<(), RtiError>;

    // Interactions

    fn send_interaction(
        &mut self,
        class: InteractionClassHandle,
        parameters: EncodedFields,
        timestamp: Option<LogicalTime>,
    ) -> Result<(), RtiError>;

    // Time and synchronization

    /// Granted later by `FederateCallbacks::time_advance_grant`
    fn time_advance_request(&mut self, time: LogicalTime) -> Result<(), RtiError>;

    fn synchronization_point_achieved(&mut self, label: &str) -> Result<(), RtiError>;

    /// Gives the runtime a chance to deliver pending callbacks
    fn tick(&mut self, callbacks: &mut dyn FederateCallbacks) -> Result<(), RtiError>;

    // Services this gateway does not implement on top of the runtime

    fn request_federation_save(&mut self, _label: &str) -> Result<(), RtiError> {
        Err(RtiError::Unsupported {
            service: "federation save",
        })
    }

    fn request_federation_restore(&mut self, _label: &str) -> Result<(), RtiError> {
        Err(RtiError::Unsupported {
            service: "federation restore",
        })
    }

    fn attribute_ownership_acquisition(
        &mut self,
        _instance: ObjectInstanceHandle,
        _attributes: &[FieldHandle],
    ) -> Result<(), RtiError> {
        Err(RtiError::Unsupported {
            service: "ownership management",
        })
    }
}
