use anyhow::{Context, Result};
use async_trait::async_trait;
use relaycall_core::{SdpKind, SessionSdp};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_local::TrackLocal;

use crate::transport::{
    LinkState, PeerTransport, TransportConfig, TransportEvent, TransportFactory,
};

/// Default [`TransportFactory`] backed by the `webrtc` crate.
pub struct RtcTransportFactory;

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        config: &TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>> {
        Ok(Box::new(RtcPeerTransport::new(config, event_tx).await?))
    }
}

pub struct RtcPeerTransport {
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcPeerTransport {
    pub async fn new(
        config: &TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|s| RTCIceServer {
                    urls: s.urls.clone(),
                    username: s.username.clone().unwrap_or_default(),
                    credential: s.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // Trickle ICE: local candidates go out through the session loop.
        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let Ok(value) = serde_json::to_value(&init) else {
                    return;
                };
                let _ = tx.send(TransportEvent::CandidateGenerated(value)).await;
            })
        }));

        let state_tx = event_tx.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    debug!(state = ?s, "ICE connection state change");
                    let link = match s {
                        RTCIceConnectionState::Connected => LinkState::Connected,
                        RTCIceConnectionState::Failed => LinkState::Failed,
                        RTCIceConnectionState::Closed => LinkState::Closed,
                        _ => return,
                    };
                    let _ = tx.send(TransportEvent::Link(link)).await;
                })
            },
        ));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl PeerTransport for RtcPeerTransport {
    async fn create_offer(&self) -> Result<SessionSdp> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionSdp::new(SdpKind::Offer, offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionSdp> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionSdp::new(SdpKind::Answer, answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionSdp) -> Result<()> {
        let desc = to_rtc_description(&desc)?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionSdp) -> Result<()> {
        let desc = to_rtc_description(&desc)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: Value) -> Result<()> {
        let init: RTCIceCandidateInit =
            serde_json::from_value(candidate).context("failed to parse ICE candidate JSON")?;
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn attach_tracks(&self, tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>) -> Result<()> {
        for track in tracks {
            self.peer_connection.add_track(track).await?;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn to_rtc_description(desc: &SessionSdp) -> Result<RTCSessionDescription> {
    let sdp = desc
        .sdp()
        .context("description blob carries no sdp text")?
        .to_string();
    let desc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(sdp)?,
    };
    Ok(desc)
}
