use anyhow::Result;
use async_trait::async_trait;

/// Outbound half of the relay channel the two peers signal over (a Phoenix
/// channel, a websocket, anything that delivers messages in order).
///
/// The inbound half is an ordered `mpsc::Receiver<String>` handed to
/// [`crate::CallSession::new`]; the session processes each payload to
/// completion before the next.
#[async_trait]
pub trait RelayChannel: Send + Sync {
    /// Join handshake. Called once, before any traffic flows.
    async fn join(&mut self) -> Result<()>;

    /// Push one serialized message body to the remote peer.
    async fn push(&self, body: String) -> Result<()>;
}
