use anyhow::Result;
use async_trait::async_trait;
use relaycall_core::{SdpKind, SessionSdp};
use relaycall_session::{PeerTransport, TransportConfig, TransportEvent, TransportFactory};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use webrtc::track::track_local::TrackLocal;

/// One recorded call against a mock transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpKind),
    SetRemote(SdpKind),
    AddCandidate(Value),
    AttachTracks(usize),
    Close,
}

/// Shared call log of one mock transport, kept alive by the factory so
/// assertions survive the transport being dropped.
#[derive(Clone, Default)]
pub struct TransportLog {
    calls: Arc<Mutex<Vec<TransportCall>>>,
}

impl TransportLog {
    fn record(&self, call: TransportCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn candidates(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::AddCandidate(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn closed(&self) -> bool {
        self.calls().contains(&TransportCall::Close)
    }
}

struct MockTransport {
    log: TransportLog,
    fail_offer: bool,
    fail_answer: bool,
    fail_attach: bool,
}

#[async_trait]
impl PeerTransport for MockTransport {
    async fn create_offer(&self) -> Result<SessionSdp> {
        if self.fail_offer {
            anyhow::bail!("createOffer rejected");
        }
        self.log.record(TransportCall::CreateOffer);
        Ok(SessionSdp::new(SdpKind::Offer, "v=0 mock-offer"))
    }

    async fn create_answer(&self) -> Result<SessionSdp> {
        if self.fail_answer {
            anyhow::bail!("createAnswer rejected");
        }
        self.log.record(TransportCall::CreateAnswer);
        Ok(SessionSdp::new(SdpKind::Answer, "v=0 mock-answer"))
    }

    async fn set_local_description(&self, desc: SessionSdp) -> Result<()> {
        self.log.record(TransportCall::SetLocal(desc.kind));
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionSdp) -> Result<()> {
        self.log.record(TransportCall::SetRemote(desc.kind));
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: Value) -> Result<()> {
        self.log.record(TransportCall::AddCandidate(candidate));
        Ok(())
    }

    async fn attach_tracks(&self, tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>) -> Result<()> {
        if self.fail_attach {
            anyhow::bail!("addTrack rejected");
        }
        self.log.record(TransportCall::AttachTracks(tracks.len()));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.log.record(TransportCall::Close);
        Ok(())
    }
}

/// Factory handing out mock transports. Keeps every transport's log plus the
/// event sender the session passed in, so tests can both inspect calls and
/// inject transport events (candidates, link changes).
#[derive(Clone, Default)]
pub struct MockTransportFactory {
    fail_create: bool,
    fail_offer: bool,
    fail_answer: bool,
    fail_attach: bool,
    logs: Arc<Mutex<Vec<TransportLog>>>,
    event_txs: Arc<Mutex<Vec<mpsc::Sender<TransportEvent>>>>,
}

impl MockTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create() -> Self {
        Self { fail_create: true, ..Self::default() }
    }

    pub fn failing_offer() -> Self {
        Self { fail_offer: true, ..Self::default() }
    }

    pub fn failing_answer() -> Self {
        Self { fail_answer: true, ..Self::default() }
    }

    pub fn failing_attach() -> Self {
        Self { fail_attach: true, ..Self::default() }
    }

    /// How many transports were created.
    pub fn created(&self) -> usize {
        self.logs.lock().unwrap().len()
    }

    pub fn log(&self, index: usize) -> TransportLog {
        self.logs.lock().unwrap()[index].clone()
    }

    /// Inject an event as if the most recent transport produced it.
    pub async fn emit(&self, event: TransportEvent) {
        let tx = self
            .event_txs
            .lock()
            .unwrap()
            .last()
            .expect("no transport created yet")
            .clone();
        tx.send(event).await.expect("session loop gone");
    }
}

#[async_trait]
impl TransportFactory for MockTransportFactory {
    async fn create(
        &self,
        _config: &TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>> {
        if self.fail_create {
            anyhow::bail!("transport unavailable");
        }
        let log = TransportLog::default();
        self.logs.lock().unwrap().push(log.clone());
        self.event_txs.lock().unwrap().push(event_tx);
        Ok(Box::new(MockTransport {
            log,
            fail_offer: self.fail_offer,
            fail_answer: self.fail_answer,
            fail_attach: self.fail_attach,
        }))
    }
}
