/// Commands the host sends into the session loop.
#[derive(Debug)]
pub enum SessionCommand {
    /// Ask the remote Initiator to start a call (Responder only).
    RequestParticipation { broadcaster_id: String },

    /// Start a call locally (Initiator only).
    Call,

    /// Tear down the current call. Idempotent.
    Hangup,
}
