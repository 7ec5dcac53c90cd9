/// Lifecycle of a `FederateSession`. Transitions only move forward.
///
/// Late joiners go straight from `Joined` to `Running`, and from `Running`
/// to `Resigned`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionState {
    Constructed,
    Joining,
    Joined,
    AwaitingPopulate,
    AwaitingRun,
    Running,
    AwaitingResign,
    /// The session has left the federation, or never managed to join it
    Resigned,
}

impl SessionState {
    /// Whether the federate is currently a member of the federation
    pub fn is_joined(&self) -> bool {
        matches!(
            self,
            SessionState::Joined
                | SessionState::AwaitingPopulate
                | SessionState::AwaitingRun
                | SessionState::Running
                | SessionState::AwaitingResign
        )
    }
}
