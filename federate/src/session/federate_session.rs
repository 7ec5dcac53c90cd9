use std::{
    collections::{HashMap, HashSet},
    thread,
};

use log::{debug, info, warn};

use fedgate_shared::{
    FederateHandle, FieldHandle, FieldMap, Interaction, LogicalTime, ObjectClassHandle,
    ObjectInstanceHandle, ObjectModelIndex, ObjectReflection,
};

use crate::{
    session::{
        field_map,
        rewriter::{C2wBookkeeping, InteractionRewriter, RewriteContext},
        sync_points::{READY_TO_POPULATE, READY_TO_RESIGN, READY_TO_RUN, SIMULATION_END_INTERACTION},
    },
    Capability, FederateAmbassador, FederateApplication, FederateConfig, FederateError,
    RtiAmbassador, RtiError, SessionState,
};

struct RegisteredObject {
    class_path: String,
    class_handle: ObjectClassHandle,
}

/// Drives one federate through join, synchronize, run and resign on behalf
/// of a hosted `FederateApplication`.
///
/// Everything happens on the calling thread. Runtime callbacks are only
/// delivered inside `tick`, buffered in the `FederateAmbassador`, and
/// dispatched to the application between time steps.
pub struct FederateSession {
    config: FederateConfig,
    object_model: ObjectModelIndex,
    rti: Box<dyn RtiAmbassador>,
    ambassador: FederateAmbassador,
    state: SessionState,
    federate_handle: Option<FederateHandle>,
    rewriter: Option<Box<dyn InteractionRewriter>>,
    simulation_end_path: String,
    // Loop control
    time_started: bool,
    exit_requested: bool,
    simulation_ended: bool,
    // Objects
    registered_objects: HashMap<ObjectInstanceHandle, RegisteredObject>,
    known_objects: HashSet<String>,
}

impl FederateSession {
    pub fn new(
        config: FederateConfig,
        object_model: ObjectModelIndex,
        rti: Box<dyn RtiAmbassador>,
    ) -> Result<Self, FederateError> {
        config.validate()?;

        Ok(Self {
            config,
            object_model,
            rti,
            ambassador: FederateAmbassador::new(),
            state: SessionState::Constructed,
            federate_handle: None,
            rewriter: Some(Box::new(C2wBookkeeping)),
            simulation_end_path: SIMULATION_END_INTERACTION.to_string(),
            time_started: false,
            exit_requested: false,
            simulation_ended: false,
            registered_objects: HashMap::new(),
            known_objects: HashSet::new(),
        })
    }

    // Setup

    /// Designates the interaction whose receipt ends the main loop
    pub fn set_simulation_end_interaction(&mut self, full_path: &str) -> &mut Self {
        self.simulation_end_path = full_path.to_string();
        self
    }

    pub fn set_interaction_rewriter(&mut self, rewriter: Box<dyn InteractionRewriter>) -> &mut Self {
        self.rewriter = Some(rewriter);
        self
    }

    pub fn clear_interaction_rewriter(&mut self) -> &mut Self {
        self.rewriter = None;
        self
    }

    // Accessors

    pub fn config(&self) -> &FederateConfig {
        &self.config
    }

    pub fn object_model(&self) -> &ObjectModelIndex {
        &self.object_model
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runtime-reported state as of the last tick
    pub fn ambassador(&self) -> &FederateAmbassador {
        &self.ambassador
    }

    pub fn federate_handle(&self) -> Option<FederateHandle> {
        self.federate_handle
    }

    /// Current granted logical time
    pub fn logical_time(&self) -> LogicalTime {
        self.ambassador.logical_time()
    }

    /// Earliest timestamp this federate may attach to an outgoing message
    pub fn earliest_timestamp(&self) -> LogicalTime {
        self.ambassador.logical_time() + self.config.lookahead
    }

    /// True once the run barrier has passed (or immediately for late joiners).
    /// Lets the application tell initialization traffic from main-loop traffic.
    pub fn has_time_started(&self) -> bool {
        self.time_started
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn simulation_ended(&self) -> bool {
        self.simulation_ended
    }

    /// Names of remote instances discovered and not yet removed, as of the last drain
    pub fn known_object_names(&self) -> impl Iterator<Item = &str> {
        self.known_objects.iter().map(String::as_str)
    }

    /// Observed at the top of the main loop; an in-progress step finishes first
    pub fn request_exit(&mut self) {
        info!("Exit requested for federate '{}'", self.config.federate_name);
        self.exit_requested = true;
    }

    // Lifecycle

    /// Runs the whole session to completion. May only be called once.
    ///
    /// Once joined, `terminate` and resignation are attempted on every exit
    /// path. When an earlier step failed, cleanup failures are logged and the
    /// original fault is returned.
    pub fn run(&mut self, app: &mut dyn FederateApplication) -> Result<(), FederateError> {
        if self.state != SessionState::Constructed {
            return Err(FederateError::InvalidState {
                operation: "run",
                state: self.state,
            });
        }

        if let Err(error) = self.join() {
            self.transition(SessionState::Resigned);
            return Err(error);
        }

        let result = self.run_joined(app);
        if let Err(error) = &result {
            warn!(
                "Federate '{}' stopping after fault: {}",
                self.config.federate_name, error
            );
        }

        let terminated = app.terminate(self);
        let resigned = self.resign();

        match result {
            Ok(()) => {
                terminated?;
                resigned
            }
            Err(error) => {
                if let Err(cleanup) = terminated {
                    warn!("terminate() failed during cleanup: {}", cleanup);
                }
                if let Err(cleanup) = resigned {
                    warn!("Resign failed during cleanup: {}", cleanup);
                }
                Err(error)
            }
        }
    }

    /// Lets the runtime deliver pending callbacks into the ambassador.
    ///
    /// Delivered events are dispatched at the next drain, which for a call
    /// made from `do_time_step` is later in the same step.
    pub fn tick(&mut self) -> Result<(), FederateError> {
        self.require_joined("tick")?;

        let delivered = self.ambassador.callbacks_delivered();
        let result = self.rti.tick(&mut self.ambassador);
        let violation = self.ambassador.take_protocol_violation();
        result.map_err(|error| FederateError::from_rti("tick", error))?;
        if let Some(error) = violation {
            return Err(FederateError::from_rti(
                "tick",
                RtiError::FederateInternal(error),
            ));
        }

        if self.ambassador.callbacks_delivered() == delivered && !self.ambassador.is_time_advancing()
        {
            debug!("Tick delivered no callbacks while no time advance was pending");
        }
        Ok(())
    }

    // Outgoing

    /// Sends an interaction in receive order
    pub fn send_interaction(&mut self, full_path: &str, fields: &FieldMap) -> Result<(), FederateError> {
        self.send_interaction_inner(full_path, fields, None)
    }

    /// Sends an interaction in timestamp order; `time` must not be earlier
    /// than `earliest_timestamp()`
    pub fn send_interaction_at(
        &mut self,
        full_path: &str,
        fields: &FieldMap,
        time: LogicalTime,
    ) -> Result<(), FederateError> {
        self.check_timestamp(time)?;
        self.send_interaction_inner(full_path, fields, Some(time))
    }

    fn send_interaction_inner(
        &mut self,
        full_path: &str,
        fields: &FieldMap,
        timestamp: Option<LogicalTime>,
    ) -> Result<(), FederateError> {
        self.require_joined("send an interaction")?;

        let Some(class) = self.object_model.interaction_type(full_path) else {
            return Err(FederateError::NotInObjectModel {
                kind: "interaction",
                path: full_path.to_string(),
            });
        };
        if !class.is_published() {
            return Err(FederateError::NotPublished {
                path: full_path.to_string(),
            });
        }

        let mut fields = fields.clone();
        if let Some(rewriter) = &self.rewriter {
            let context = RewriteContext {
                federate_name: &self.config.federate_name,
                logical_time: self.ambassador.logical_time(),
            };
            rewriter.rewrite(class, &mut fields, &context);
        }

        let class_handle = self
            .rti
            .interaction_class_handle(full_path)
            .map_err(|error| FederateError::from_rti("resolve interaction class", error))?;
        let encoded = field_map::encode_parameters(self.rti.as_ref(), class, class_handle, &fields)?;

        debug!("Sending interaction {} ({:?})", full_path, timestamp);
        self.rti
            .send_interaction(class_handle, encoded, timestamp)
            .map_err(|error| FederateError::from_rti("send interaction", error))
    }

    /// Registers a new instance of a published object class
    pub fn register_object(&mut self, full_path: &str) -> Result<ObjectInstanceHandle, FederateError> {
        self.require_joined("register an object")?;

        let Some(class) = self.object_model.object_type(full_path) else {
            return Err(FederateError::NotInObjectModel {
                kind: "object",
                path: full_path.to_string(),
            });
        };
        if !class.is_published() {
            return Err(FederateError::NotPublished {
                path: full_path.to_string(),
            });
        }

        let class_handle = self
            .rti
            .object_class_handle(full_path)
            .map_err(|error| FederateError::from_rti("resolve object class", error))?;
        let instance = self
            .rti
            .register_object_instance(class_handle)
            .map_err(|error| FederateError::from_rti("register object instance", error))?;

        info!("Registered {} as {}", full_path, instance);
        self.registered_objects.insert(
            instance,
            RegisteredObject {
                class_path: full_path.to_string(),
                class_handle,
            },
        );
        Ok(instance)
    }

    /// Sends attribute values for a registered instance in receive order
    pub fn update_object(
        &mut self,
        instance: ObjectInstanceHandle,
        fields: &FieldMap,
    ) -> Result<(), FederateError> {
        self.update_object_inner(instance, fields, None)
    }

    pub fn update_object_at(
        &mut self,
        instance: ObjectInstanceHandle,
        fields: &FieldMap,
        time: LogicalTime,
    ) -> Result<(), FederateError> {
        self.check_timestamp(time)?;
        self.update_object_inner(instance, fields, Some(time))
    }

    fn update_object_inner(
        &mut self,
        instance: ObjectInstanceHandle,
        fields: &FieldMap,
        timestamp: Option<LogicalTime>,
    ) -> Result<(), FederateError> {
        self.require_joined("update an object")?;

        let Some(registered) = self.registered_objects.get(&instance) else {
            return Err(FederateError::UnknownObjectInstance { instance });
        };
        let Some(class) = self.object_model.object_type(&registered.class_path) else {
            return Err(FederateError::NotInObjectModel {
                kind: "object",
                path: registered.class_path.clone(),
            });
        };

        let encoded = field_map::encode_attributes(
            self.rti.as_ref(),
            class,
            registered.class_handle,
            fields,
        )?;

        debug!("Updating {} ({:?})", instance, timestamp);
        self.rti
            .update_attribute_values(instance, encoded, timestamp)
            .map_err(|error| FederateError::from_rti("update attribute values", error))
    }

    pub fn delete_object(&mut self, instance: ObjectInstanceHandle) -> Result<(), FederateError> {
        self.require_joined("delete an object")?;

        if self.registered_objects.remove(&instance).is_none() {
            return Err(FederateError::UnknownObjectInstance { instance });
        }
        self.rti
            .delete_object_instance(instance)
            .map_err(|error| FederateError::from_rti("delete object instance", error))
    }

    // Services the runtime may not implement

    pub fn request_federation_save(&mut self, label: &str) -> Result<(), FederateError> {
        self.require_joined("request a federation save")?;
        self.rti
            .request_federation_save(label)
            .map_err(|error| FederateError::from_rti("request federation save", error))
    }

    pub fn request_federation_restore(&mut self, label: &str) -> Result<(), FederateError> {
        self.require_joined("request a federation restore")?;
        self.rti
            .request_federation_restore(label)
            .map_err(|error| FederateError::from_rti("request federation restore", error))
    }

    /// Asks the runtime to transfer ownership of attributes of a registered
    /// or discovered instance to this federate
    pub fn acquire_attribute_ownership(
        &mut self,
        instance: ObjectInstanceHandle,
        attribute_names: &[&str],
    ) -> Result<(), FederateError> {
        self.require_joined("acquire attribute ownership")?;

        let class_handle = match self.registered_objects.get(&instance) {
            Some(registered) => registered.class_handle,
            None => match self.ambassador.discovered_instance(&instance) {
                Some(discovered) => discovered.class,
                None => return Err(FederateError::UnknownObjectInstance { instance }),
            },
        };
        let attributes: Vec<FieldHandle> = field_map::attribute_handles(
            self.rti.as_ref(),
            class_handle,
            attribute_names.iter().copied(),
        )?;

        self.rti
            .attribute_ownership_acquisition(instance, &attributes)
            .map_err(|error| FederateError::from_rti("acquire attribute ownership", error))
    }

    // Protocol steps

    fn run_joined(&mut self, app: &mut dyn FederateApplication) -> Result<(), FederateError> {
        let late_joiner = self.config.late_joiner;

        self.enable_capabilities()?;
        self.declare()?;

        app.initialize_self(self)?;

        if !late_joiner {
            self.transition(SessionState::AwaitingPopulate);
            self.synchronize(READY_TO_POPULATE)?;
        }

        app.initialize_with_peers(self)?;
        self.drain_incoming(app)?;

        if !late_joiner {
            self.transition(SessionState::AwaitingRun);
            self.synchronize(READY_TO_RUN)?;
        }

        self.time_started = true;
        self.transition(SessionState::Running);
        info!(
            "Federate '{}' running from logical time {}",
            self.config.federate_name,
            self.ambassador.logical_time()
        );

        while !self.exit_requested {
            let time = self.ambassador.logical_time();
            app.do_time_step(self, time)?;

            self.drain_incoming(app)?;
            if self.simulation_ended {
                break;
            }

            self.advance_time()?;
        }

        if self.simulation_ended && !late_joiner {
            self.transition(SessionState::AwaitingResign);
            self.synchronize(READY_TO_RESIGN)?;
        }

        Ok(())
    }

    fn join(&mut self) -> Result<(), FederateError> {
        self.transition(SessionState::Joining);

        let attempts = self.config.max_join_attempts;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .rti
                .join_federation(&self.config.federate_name, &self.config.federation_name)
            {
                Ok(handle) => {
                    info!(
                        "Federate '{}' joined federation '{}' as {}",
                        self.config.federate_name, self.config.federation_name, handle
                    );
                    self.federate_handle = Some(handle);
                    self.transition(SessionState::Joined);
                    return Ok(());
                }
                Err(error) if error.is_retryable() => {
                    if attempt >= attempts {
                        return Err(FederateError::JoinAttemptsExhausted {
                            federation: self.config.federation_name.clone(),
                            attempts,
                            last_error: error,
                        });
                    }
                    warn!(
                        "Join attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        attempts,
                        error,
                        self.config.join_retry_delay()
                    );
                    thread::sleep(self.config.join_retry_delay());
                }
                Err(error) => {
                    return Err(FederateError::JoinRejected {
                        federation: self.config.federation_name.clone(),
                        source: error,
                    });
                }
            }
        }
    }

    fn enable_capabilities(&mut self) -> Result<(), FederateError> {
        self.enable_capability(Capability::AsynchronousDelivery)?;
        self.enable_capability(Capability::TimeConstrained)?;
        self.enable_capability(Capability::TimeRegulation)?;
        Ok(())
    }

    /// Enables one capability and waits for its confirmation callback.
    /// A capability the runtime reports as already enabled is not waited for.
    fn enable_capability(&mut self, capability: Capability) -> Result<(), FederateError> {
        let result = match capability {
            Capability::AsynchronousDelivery => self.rti.enable_asynchronous_delivery(),
            Capability::TimeConstrained => self.rti.enable_time_constrained(),
            Capability::TimeRegulation => self.rti.enable_time_regulation(self.config.lookahead),
        };

        match result {
            Ok(()) | Err(RtiError::EnablePending(_)) => {}
            Err(RtiError::AlreadyEnabled(_)) => {
                info!("Capability '{}' already enabled", capability);
                self.ambassador.mark_capability_enabled(capability);
                return Ok(());
            }
            Err(error) => return Err(FederateError::from_rti("enable capability", error)),
        }

        match capability {
            Capability::AsynchronousDelivery => {}
            Capability::TimeConstrained => {
                self.tick_until(FederateAmbassador::is_time_constrained)?;
            }
            Capability::TimeRegulation => {
                self.tick_until(FederateAmbassador::is_time_regulating)?;
            }
        }
        info!("Capability '{}' enabled", capability);
        Ok(())
    }

    /// Publishes and subscribes everything the object model declares
    fn declare(&mut self) -> Result<(), FederateError> {
        let simulation_end = self
            .object_model
            .interaction_type(&self.simulation_end_path)
            .map(|class| class.id());

        for class in self.object_model.interaction_types() {
            let subscribe = class.is_subscribed() || Some(class.id()) == simulation_end;
            if !class.is_published() && !subscribe {
                continue;
            }

            let handle = self
                .rti
                .interaction_class_handle(class.full_path())
                .map_err(|error| FederateError::from_rti("resolve interaction class", error))?;

            if class.is_published() {
                self.rti
                    .publish_interaction_class(handle)
                    .map_err(|error| FederateError::from_rti("publish interaction class", error))?;
                info!("Published interaction {}", class.full_path());
            }
            if subscribe {
                self.rti.subscribe_interaction_class(handle).map_err(|error| {
                    FederateError::from_rti("subscribe interaction class", error)
                })?;
                info!("Subscribed to interaction {}", class.full_path());
            }
        }

        for class in self.object_model.object_types() {
            if !class.is_published() && !class.is_subscribed() {
                continue;
            }

            let handle = self
                .rti
                .object_class_handle(class.full_path())
                .map_err(|error| FederateError::from_rti("resolve object class", error))?;

            if class.is_published() {
                let attributes = field_map::attribute_handles(
                    self.rti.as_ref(),
                    handle,
                    class.published_fields().map(|field| field.name()),
                )?;
                self.rti
                    .publish_object_class_attributes(handle, &attributes)
                    .map_err(|error| FederateError::from_rti("publish object class", error))?;
                info!(
                    "Published object {} ({} attributes)",
                    class.full_path(),
                    attributes.len()
                );
            }
            if class.is_subscribed() {
                let attributes = field_map::attribute_handles(
                    self.rti.as_ref(),
                    handle,
                    class.subscribed_fields().map(|field| field.name()),
                )?;
                self.rti
                    .subscribe_object_class_attributes(handle, &attributes)
                    .map_err(|error| FederateError::from_rti("subscribe object class", error))?;
                info!(
                    "Subscribed to object {} ({} attributes)",
                    class.full_path(),
                    attributes.len()
                );
            }
        }

        Ok(())
    }

    /// Two-phase barrier: wait for the announcement, achieve, wait for the federation
    fn synchronize(&mut self, label: &'static str) -> Result<(), FederateError> {
        info!("Waiting for synchronization point '{}'", label);
        self.tick_until(|ambassador| ambassador.is_sync_point_pending(label))?;

        self.rti
            .synchronization_point_achieved(label)
            .map_err(|error| FederateError::from_rti("achieve synchronization point", error))?;

        info!("Achieved '{}', waiting for the federation", label);
        self.tick_until(|ambassador| !ambassador.is_sync_point_pending(label))?;
        info!("Federation synchronized on '{}'", label);
        Ok(())
    }

    fn advance_time(&mut self) -> Result<(), FederateError> {
        let requested = self.ambassador.logical_time() + self.config.step_size;
        self.rti
            .time_advance_request(requested)
            .map_err(|error| FederateError::from_rti("request time advance", error))?;
        self.ambassador.mark_time_advancing();

        self.tick_until(|ambassador| !ambassador.is_time_advancing())?;
        debug!("Granted logical time {}", self.ambassador.logical_time());
        Ok(())
    }

    /// Ticks until `ready` holds. There is no timeout; the runtime is
    /// expected to eventually deliver the confirming callback.
    fn tick_until(&mut self, ready: impl Fn(&FederateAmbassador) -> bool) -> Result<(), FederateError> {
        while !ready(&self.ambassador) {
            self.tick()?;
        }
        Ok(())
    }

    // Incoming

    fn drain_incoming(&mut self, app: &mut dyn FederateApplication) -> Result<(), FederateError> {
        while let Some(name) = self.ambassador.pop_discovered_name() {
            debug!("Discovered object instance '{}'", name);
            self.known_objects.insert(name);
        }
        while let Some(interaction) = self.ambassador.pop_interaction() {
            self.dispatch_interaction(app, interaction)?;
        }
        while let Some(reflection) = self.ambassador.pop_reflection() {
            self.dispatch_reflection(app, reflection)?;
        }
        while let Some(name) = self.ambassador.pop_removed_name() {
            debug!("Removed object instance '{}'", name);
            self.known_objects.remove(&name);
        }
        Ok(())
    }

    fn dispatch_interaction(
        &mut self,
        app: &mut dyn FederateApplication,
        interaction: Interaction,
    ) -> Result<(), FederateError> {
        let class_name = self
            .rti
            .interaction_class_name(interaction.class())
            .map_err(|error| FederateError::from_rti("resolve interaction class name", error))?;
        let Some(class) = self.object_model.interaction_type(&class_name) else {
            warn!("Received interaction '{}', which is not in the object model", class_name);
            return Ok(());
        };
        let fields = field_map::decode_parameters(
            self.rti.as_ref(),
            class,
            interaction.class(),
            interaction.fields(),
        )?;

        if class_name == self.simulation_end_path {
            info!("Simulation end received");
            self.simulation_ended = true;
        }

        let time = self.ambassador.logical_time();
        app.receive_interaction(self, time, &class_name, &fields)
    }

    fn dispatch_reflection(
        &mut self,
        app: &mut dyn FederateApplication,
        reflection: ObjectReflection,
    ) -> Result<(), FederateError> {
        let class_name = self
            .rti
            .object_class_name(reflection.class())
            .map_err(|error| FederateError::from_rti("resolve object class name", error))?;
        let Some(class) = self.object_model.object_type(&class_name) else {
            warn!("Reflected object class '{}' is not in the object model", class_name);
            return Ok(());
        };
        let fields = field_map::decode_attributes(
            self.rti.as_ref(),
            class,
            reflection.class(),
            reflection.fields(),
        )?;

        let time = self.ambassador.logical_time();
        app.receive_object(self, time, &class_name, reflection.instance_name(), &fields)
    }

    // Helpers

    fn resign(&mut self) -> Result<(), FederateError> {
        let result = self
            .rti
            .resign_federation()
            .map_err(|error| FederateError::from_rti("resign", error));
        if result.is_ok() {
            info!("Federate '{}' resigned", self.config.federate_name);
        }
        self.transition(SessionState::Resigned);
        result
    }

    fn check_timestamp(&self, time: LogicalTime) -> Result<(), FederateError> {
        let earliest = self.earliest_timestamp();
        if time < earliest {
            return Err(FederateError::TimestampTooEarly {
                requested: time,
                earliest,
            });
        }
        Ok(())
    }

    fn require_joined(&self, operation: &'static str) -> Result<(), FederateError> {
        if !self.state.is_joined() {
            return Err(FederateError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
