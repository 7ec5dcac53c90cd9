use fedgate_shared::{FieldMap, LogicalTime};

use crate::{FederateError, FederateSession};

/// Callbacks implemented by the application a `FederateSession` hosts.
///
/// Call order is fixed: one `initialize_self`, one `initialize_with_peers`,
/// then any interleaving of `receive_interaction`, `receive_object` and
/// `do_time_step`, then one `terminate`. Every callback receives the session
/// so it can send, register objects, tick or request exit.
///
/// Field maps carry only the fields present in the update that produced
/// them. Fields that are absent did not change; merging into the
/// application's own state is up to the application.
pub trait FederateApplication {
    /// Runs once after joining and declaring, before any synchronization
    fn initialize_self(&mut self, _federate: &mut FederateSession) -> Result<(), FederateError> {
        Ok(())
    }

    /// Runs once after the population barrier, before the run barrier
    fn initialize_with_peers(
        &mut self,
        _federate: &mut FederateSession,
    ) -> Result<(), FederateError> {
        Ok(())
    }

    fn receive_interaction(
        &mut self,
        _federate: &mut FederateSession,
        _time: LogicalTime,
        _type_name: &str,
        _fields: &FieldMap,
    ) -> Result<(), FederateError> {
        Ok(())
    }

    fn receive_object(
        &mut self,
        _federate: &mut FederateSession,
        _time: LogicalTime,
        _type_name: &str,
        _instance_name: &str,
        _fields: &FieldMap,
    ) -> Result<(), FederateError> {
        Ok(())
    }

    fn do_time_step(
        &mut self,
        federate: &mut FederateSession,
        time: LogicalTime,
    ) -> Result<(), FederateError>;

    /// Runs once on the way out, including after a fault
    fn terminate(&mut self, _federate: &mut FederateSession) -> Result<(), FederateError> {
        Ok(())
    }
}
