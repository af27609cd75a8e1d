use anyhow::Result;
use async_trait::async_trait;
use relaycall_core::SessionSdp;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use webrtc::track::track_local::TrackLocal;

use crate::transport::{TransportConfig, TransportEvent};

/// Handle to one peer connection. Created lazily on the first negotiation
/// attempt, owned exclusively by the session, destroyed on hangup or on a
/// fatal link failure.
///
/// Implementations are expected to buffer remote candidates added before a
/// remote description is set; candidate order relative to the description
/// exchange is not guaranteed.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionSdp>;
    async fn create_answer(&self) -> Result<SessionSdp>;
    async fn set_local_description(&self, desc: SessionSdp) -> Result<()>;
    async fn set_remote_description(&self, desc: SessionSdp) -> Result<()>;
    async fn add_ice_candidate(&self, candidate: Value) -> Result<()>;
    async fn attach_tracks(&self, tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

/// Builds fresh transports. `event_tx` is where the transport reports local
/// candidates and link state changes; the session loop drains it.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(
        &self,
        config: &TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>>;
}
