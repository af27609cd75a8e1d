use std::fmt;

/// Lifecycle state of a call session. Exactly one value is active at a time.
///
/// `Negotiating` is transient: it only exists between the start of a
/// negotiation attempt and its first success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Negotiating,
    InProgress,
    Ended,
    Failed,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CallState::Idle => "idle",
            CallState::Negotiating => "negotiating",
            CallState::InProgress => "in_progress",
            CallState::Ended => "ended",
            CallState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
