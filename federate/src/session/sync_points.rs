/// Barrier every non-late federate achieves before initializing with its peers
pub const READY_TO_POPULATE: &str = "readyToPopulate";
/// Barrier every non-late federate achieves before the first time step
pub const READY_TO_RUN: &str = "readyToRun";
/// Barrier achieved after the simulation-end interaction, before resigning
pub const READY_TO_RESIGN: &str = "readyToResign";

/// Interaction whose receipt ends the main loop, unless overridden with
/// `FederateSession::set_simulation_end_interaction`
pub const SIMULATION_END_INTERACTION: &str =
    "InteractionRoot.C2WInteractionRoot.SimulationControl.SimEnd";
