mod application;
mod federate_session;
mod field_map;
mod rewriter;
mod session_state;
mod sync_points;

pub use application::FederateApplication;
pub use federate_session::FederateSession;
pub use rewriter::{C2wBookkeeping, InteractionRewriter, RewriteContext, C2W_INTERACTION_ROOT};
pub use session_state::SessionState;
pub use sync_points::{
    READY_TO_POPULATE, READY_TO_RESIGN, READY_TO_RUN, SIMULATION_END_INTERACTION,
};
