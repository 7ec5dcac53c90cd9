use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, warn};

use fedgate_shared::{
    EncodedFields, Interaction, InteractionClassHandle, LogicalTime, ObjectClassHandle,
    ObjectInstanceHandle, ObjectReflection,
};

use crate::{CallbackError, Capability, DiscoveredInstance, FederateCallbacks};

/// Buffers everything the runtime reports so the session can consume it
/// synchronously between ticks.
///
/// The runtime writes through `FederateCallbacks` during `tick`; the session
/// reads through the accessors and drains the queues afterwards. Both happen
/// on the session's thread and never interleave, so no locking is needed.
pub struct FederateAmbassador {
    // Synchronization
    pending_sync_points: HashSet<String>,
    // Time
    logical_time: LogicalTime,
    time_constrained: bool,
    time_regulating: bool,
    time_advancing: bool,
    // Objects
    discovered: HashMap<ObjectInstanceHandle, DiscoveredInstance>,
    // Queues
    discovered_names: VecDeque<String>,
    removed_names: VecDeque<String>,
    interactions: VecDeque<Interaction>,
    reflections: VecDeque<ObjectReflection>,
    // Diagnostics
    callbacks_delivered: u64,
    protocol_violation: Option<CallbackError>,
}

impl Default for FederateAmbassador {
    fn default() -> Self {
        Self::new()
    }
}

impl FederateAmbassador {
    pub fn new() -> Self {
        Self {
            pending_sync_points: HashSet::new(),
            logical_time: 0.0,
            time_constrained: false,
            time_regulating: false,
            time_advancing: false,
            discovered: HashMap::new(),
            discovered_names: VecDeque::new(),
            removed_names: VecDeque::new(),
            interactions: VecDeque::new(),
            reflections: VecDeque::new(),
            callbacks_delivered: 0,
            protocol_violation: None,
        }
    }

    // State

    /// Announced, but not yet achieved by the whole federation
    pub fn is_sync_point_pending(&self, label: &str) -> bool {
        self.pending_sync_points.contains(label)
    }

    pub fn logical_time(&self) -> LogicalTime {
        self.logical_time
    }

    /// A time advance was requested and its grant has not arrived yet
    pub fn is_time_advancing(&self) -> bool {
        self.time_advancing
    }

    pub fn is_time_constrained(&self) -> bool {
        self.time_constrained
    }

    pub fn is_time_regulating(&self) -> bool {
        self.time_regulating
    }

    pub fn discovered_instance(&self, instance: &ObjectInstanceHandle) -> Option<&DiscoveredInstance> {
        self.discovered.get(instance)
    }

    /// Total callbacks received so far, used to spot ticks that delivered nothing
    pub fn callbacks_delivered(&self) -> u64 {
        self.callbacks_delivered
    }

    pub fn has_queued_events(&self) -> bool {
        !self.interactions.is_empty()
            || !self.reflections.is_empty()
            || !self.discovered_names.is_empty()
            || !self.removed_names.is_empty()
    }

    // Queues

    pub fn pop_interaction(&mut self) -> Option<Interaction> {
        self.interactions.pop_front()
    }

    pub fn pop_reflection(&mut self) -> Option<ObjectReflection> {
        self.reflections.pop_front()
    }

    pub fn pop_discovered_name(&mut self) -> Option<String> {
        self.discovered_names.pop_front()
    }

    pub fn pop_removed_name(&mut self) -> Option<String> {
        self.removed_names.pop_front()
    }

    // Crate-public

    /// Called by the session right after a time advance request is accepted
    pub(crate) fn mark_time_advancing(&mut self) {
        self.time_advancing = true;
    }

    /// Called by the session when the runtime reports a capability as
    /// already enabled, so no confirmation callback will arrive
    pub(crate) fn mark_capability_enabled(&mut self, capability: Capability) {
        match capability {
            Capability::AsynchronousDelivery => {}
            Capability::TimeConstrained => self.time_constrained = true,
            Capability::TimeRegulation => self.time_regulating = true,
        }
    }

    /// The first fatal callback error since the last call, whether or not
    /// the runtime passed it back through `tick`
    pub(crate) fn take_protocol_violation(&mut self) -> Option<CallbackError> {
        self.protocol_violation.take()
    }

    fn record_callback(&mut self) {
        self.callbacks_delivered += 1;
    }
}

impl FederateCallbacks for FederateAmbassador {
    fn announce_synchronization_point(&mut self, label: &str) {
        self.record_callback();
        debug!("Synchronization point '{}' announced", label);
        self.pending_sync_points.insert(label.to_string());
    }

    fn federation_synchronized(&mut self, label: &str) {
        self.record_callback();
        debug!("Federation synchronized on '{}'", label);
        if !self.pending_sync_points.remove(label) {
            warn!(
                "Federation synchronized on '{}', which was never announced to this federate",
                label
            );
        }
    }

    fn time_constrained_enabled(&mut self, time: LogicalTime) {
        self.record_callback();
        self.logical_time = time;
        self.time_constrained = true;
    }

    fn time_regulation_enabled(&mut self, time: LogicalTime) {
        self.record_callback();
        self.logical_time = time;
        self.time_regulating = true;
    }

    fn time_advance_grant(&mut self, time: LogicalTime) {
        self.record_callback();
        self.logical_time = time;
        self.time_advancing = false;
    }

    fn receive_interaction(
        &mut self,
        class: InteractionClassHandle,
        parameters: EncodedFields,
        timestamp: Option<LogicalTime>,
    ) {
        self.record_callback();
        self.interactions
            .push_back(Interaction::decode(class, parameters, timestamp));
    }

    fn discover_object_instance(
        &mut self,
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: &str,
    ) -> Result<(), CallbackError> {
        self.record_callback();
        if let Some(existing) = self.discovered.get(&instance) {
            let error = CallbackError::DuplicateDiscovery {
                instance,
                existing_name: existing.name.clone(),
            };
            warn!("Rejected discovery of '{}': {}", name, error);
            self.protocol_violation.get_or_insert_with(|| error.clone());
            return Err(error);
        }
        self.discovered.insert(
            instance,
            DiscoveredInstance {
                instance,
                class,
                name: name.to_string(),
            },
        );
        self.discovered_names.push_back(name.to_string());
        Ok(())
    }

    fn reflect_attribute_values(
        &mut self,
        instance: ObjectInstanceHandle,
        attributes: EncodedFields,
        timestamp: Option<LogicalTime>,
    ) -> Result<(), CallbackError> {
        self.record_callback();
        let Some(discovered) = self.discovered.get(&instance) else {
            return Err(CallbackError::ObjectInstanceNotKnown { instance });
        };
        self.reflections.push_back(ObjectReflection::decode(
            instance,
            discovered.class,
            discovered.name.clone(),
            attributes,
            timestamp,
        ));
        Ok(())
    }

    fn remove_object_instance(
        &mut self,
        instance: ObjectInstanceHandle,
    ) -> Result<(), CallbackError> {
        self.record_callback();
        let Some(discovered) = self.discovered.remove(&instance) else {
            return Err(CallbackError::ObjectInstanceNotKnown { instance });
        };
        self.removed_names.push_back(discovered.name);
        Ok(())
    }
}
