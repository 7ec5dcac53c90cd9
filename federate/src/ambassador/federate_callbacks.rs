use fedgate_shared::{
    EncodedFields, InteractionClassHandle, LogicalTime, ObjectClassHandle, ObjectInstanceHandle,
};

use crate::CallbackError;

/// Notification entry points a runtime invokes from within
/// `RtiAmbassador::tick`.
///
/// Implementations must not block and must only record what they are told.
pub trait FederateCallbacks {
    fn announce_synchronization_point(&mut self, label: &str);

    /// Every federate in the federation has achieved `label`
    fn federation_synchronized(&mut self, label: &str);

    fn time_constrained_enabled(&mut self, time: LogicalTime);

    fn time_regulation_enabled(&mut self, time: LogicalTime);

    fn time_advance_grant(&mut self, time: LogicalTime);

    fn receive_interaction(
        &mut self,
        class: InteractionClassHandle,
        parameters: EncodedFields,
        timestamp: Option<LogicalTime>,
    );

    fn discover_object_instance(
        &mut self,
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: &str,
    ) -> Result<(), CallbackError>;

    fn reflect_attribute_values(
        &mut self,
        instance: ObjectInstanceHandle,
        attributes: EncodedFields,
        timestamp: Option<LogicalTime>,
    ) -> Result<(), CallbackError>;

    fn remove_object_instance(&mut self, instance: ObjectInstanceHandle)
        -> Result<(), CallbackError>;
}
