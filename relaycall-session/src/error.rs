use thiserror::Error;

/// Failure taxonomy for a call session. These never cross the host boundary
/// as return values; they are logged, and link failures additionally surface
/// through [`crate::LifecycleObserver::on_call_failed`].
#[derive(Debug, Error)]
pub enum CallError {
    /// createOffer / createAnswer / set description failed. No automatic
    /// recovery.
    #[error("media negotiation failed: {0:#}")]
    Negotiation(anyhow::Error),

    /// Media acquisition failed. The call attempt aborts before any
    /// negotiation state is touched.
    #[error("media capture failed: {0:#}")]
    Capture(anyhow::Error),

    /// The relay channel join handshake failed. The session is unusable
    /// until the host constructs a new one.
    #[error("unable to join relay channel: {0:#}")]
    ChannelJoin(anyhow::Error),
}
