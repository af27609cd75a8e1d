use relaycall_core::{
    CallState, Role, SdpKind, SessionId, SessionSdp, SignalMessage, classify, route,
};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::channel::RelayChannel;
use crate::error::CallError;
use crate::media::{MediaCapture, MediaConstraints, MediaStream};
use crate::observer::LifecycleObserver;
use crate::session::{SessionCommand, SessionHandle, SessionStatus};
use crate::transport::{LinkState, PeerTransport, TransportConfig, TransportEvent, TransportFactory};

const COMMAND_BUFFER: usize = 64;
const TRANSPORT_EVENT_BUFFER: usize = 256;

/// Construction-time configuration for a call session.
pub struct SessionConfig {
    pub role: Role,
    pub constraints: MediaConstraints,
    pub transport: TransportConfig,
}

impl SessionConfig {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            constraints: MediaConstraints::default(),
            transport: TransportConfig::default(),
        }
    }
}

/// The two-party call state machine.
///
/// One `CallSession` drives one side of one call over a relay channel. It is
/// an owned actor: `run()` consumes it and processes inbound payloads, host
/// commands, and transport events one at a time, so the state, the admission
/// flag, and the owned transport handle need no locking.
pub struct CallSession {
    id: SessionId,
    role: Role,
    state: CallState,
    // Single admission gate: set only when a negotiation succeeded, and only
    // while the transport handle exists.
    in_progress: bool,
    transport: Option<Box<dyn PeerTransport>>,
    media: Option<Box<dyn MediaStream>>,
    channel: Box<dyn RelayChannel>,
    inbound_rx: mpsc::Receiver<String>,
    command_rx: mpsc::Receiver<SessionCommand>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,
    factory: Box<dyn TransportFactory>,
    capture: Box<dyn MediaCapture>,
    observer: Box<dyn LifecycleObserver>,
    constraints: MediaConstraints,
    transport_config: TransportConfig,
    status_tx: watch::Sender<SessionStatus>,
}

impl CallSession {
    pub fn new(
        config: SessionConfig,
        channel: Box<dyn RelayChannel>,
        inbound_rx: mpsc::Receiver<String>,
        factory: Box<dyn TransportFactory>,
        capture: Box<dyn MediaCapture>,
        observer: Box<dyn LifecycleObserver>,
    ) -> (Self, SessionHandle) {
        let (cmd_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (transport_tx, transport_rx) = mpsc::channel(TRANSPORT_EVENT_BUFFER);
        let (status_tx, status_rx) = watch::channel(SessionStatus {
            state: CallState::Idle,
            in_progress: false,
        });

        let session = Self {
            id: SessionId::new(),
            role: config.role,
            state: CallState::Idle,
            in_progress: false,
            transport: None,
            media: None,
            channel,
            inbound_rx,
            command_rx,
            transport_rx,
            transport_tx,
            factory,
            capture,
            observer,
            constraints: config.constraints,
            transport_config: config.transport,
            status_tx,
        };

        (session, SessionHandle::new(cmd_tx, status_rx))
    }

    /// Run the session to completion.
    ///
    /// Joins the relay channel first; a failed join is logged and ends the
    /// loop (the host reconstructs the session to retry). Afterwards each
    /// inbound payload, host command, or transport event is handled to
    /// completion before the next one is picked up.
    pub async fn run(mut self) {
        if let Err(e) = self.channel.join().await {
            error!(session = %self.id, "{}", CallError::ChannelJoin(e));
            return;
        }
        info!(session = %self.id, role = %self.role, "joined relay channel");

        loop {
            tokio::select! {
                raw = self.inbound_rx.recv() => {
                    match raw {
                        Some(raw) => self.handle_inbound(&raw).await,
                        None => {
                            info!(session = %self.id, "relay channel closed, shutting down");
                            break;
                        }
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            info!(session = %self.id, "all handles dropped, shutting down");
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    match evt {
                        Some(evt) => self.handle_transport_event(evt).await,
                        None => {
                            warn!(session = %self.id, "transport event channel closed unexpectedly");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn handle_inbound(&mut self, raw: &str) {
        let Some(msg) = route(classify(raw), self.role, self.state) else {
            return;
        };

        match msg {
            SignalMessage::IceCandidate { candidate } => {
                self.receive_ice_candidate(candidate).await;
            }
            SignalMessage::Description(desc) => match desc.kind {
                SdpKind::Offer => self.receive_offer(desc).await,
                SdpKind::Answer => self.receive_answer(desc).await,
            },
            SignalMessage::ParticipationRequest { broadcaster_id } => {
                info!(session = %self.id, broadcaster_id, "participation requested, calling");
                self.start_call().await;
            }
            SignalMessage::CallEnded => self.remote_ended().await,
            SignalMessage::Unknown => {}
        }
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::RequestParticipation { broadcaster_id } => {
                self.request_participation(broadcaster_id).await;
            }
            SessionCommand::Call => {
                if self.role != Role::Initiator {
                    warn!(session = %self.id, role = %self.role, "call() is initiator-only");
                    return;
                }
                self.start_call().await;
            }
            SessionCommand::Hangup => self.hangup().await,
        }
    }

    async fn request_participation(&mut self, broadcaster_id: String) {
        if self.role != Role::Responder {
            warn!(session = %self.id, role = %self.role, "request_participation is responder-only");
            return;
        }
        info!(session = %self.id, broadcaster_id, "requesting participation");
        self.push_signal(SignalMessage::ParticipationRequest { broadcaster_id })
            .await;
    }

    /// Initiator call path: capture, then negotiate an offer. Only one
    /// negotiation is ever admitted; re-entry outside `Idle` is rejected.
    async fn start_call(&mut self) {
        if self.state != CallState::Idle {
            warn!(session = %self.id, state = %self.state, "call rejected: not idle");
            return;
        }

        let stream = match self.capture.acquire(&self.constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                // Aborts before any negotiation state is touched.
                error!(session = %self.id, "{}", CallError::Capture(e));
                return;
            }
        };

        self.set_state(CallState::Negotiating);
        match self.negotiate_offer(stream).await {
            Ok(()) => {
                self.in_progress = true;
                self.set_state(CallState::InProgress);
                info!(session = %self.id, "offer sent, call in progress");
            }
            Err(e) => {
                error!(session = %self.id, "{}", CallError::Negotiation(e));
                self.drop_transport().await;
                self.release_media().await;
                self.set_state(CallState::Idle);
            }
        }
    }

    async fn negotiate_offer(&mut self, stream: Box<dyn MediaStream>) -> anyhow::Result<()> {
        // Owned resources are stored before any fallible step so the
        // caller's rollback can stop the stream and close the transport.
        let tracks = stream.tracks();
        self.media = Some(stream);

        let transport = self
            .factory
            .create(&self.transport_config, self.transport_tx.clone())
            .await?;
        let transport = self.transport.insert(transport);
        transport.attach_tracks(tracks).await?;

        let offer = transport.create_offer().await?;
        transport.set_local_description(offer.clone()).await?;

        self.push_signal(SignalMessage::Description(offer)).await;
        Ok(())
    }

    /// Responder answer path, entered on a routed remote offer.
    async fn receive_offer(&mut self, offer: SessionSdp) {
        info!(session = %self.id, "received offer, answering");

        self.set_state(CallState::Negotiating);
        match self.negotiate_answer(offer).await {
            Ok(()) => {
                self.in_progress = true;
                self.set_state(CallState::InProgress);
                info!(session = %self.id, "answer sent, call in progress");
            }
            Err(e) => {
                error!(session = %self.id, "{}", CallError::Negotiation(e));
                self.drop_transport().await;
                self.set_state(CallState::Idle);
            }
        }
    }

    async fn negotiate_answer(&mut self, offer: SessionSdp) -> anyhow::Result<()> {
        let transport = self
            .factory
            .create(&self.transport_config, self.transport_tx.clone())
            .await?;
        // Stored up front so a failure below still gets closed on rollback.
        let transport = self.transport.insert(transport);
        transport.set_remote_description(offer).await?;

        let answer = transport.create_answer().await?;
        transport.set_local_description(answer.clone()).await?;

        self.push_signal(SignalMessage::Description(answer)).await;
        Ok(())
    }

    /// The answer completing our offer. The router only lets this through
    /// for an Initiator with an admitted negotiation, so a transport handle
    /// is expected here; a missing one means a stray answer.
    async fn receive_answer(&mut self, answer: SessionSdp) {
        let Some(transport) = &self.transport else {
            warn!(session = %self.id, "answer with no pending offer, dropping");
            return;
        };
        info!(session = %self.id, "received answer");
        if let Err(e) = transport.set_remote_description(answer).await {
            error!(session = %self.id, "{}", CallError::Negotiation(e));
        }
    }

    /// Candidates are order-independent: accepted in any state while the
    /// transport handle exists, dropped otherwise.
    async fn receive_ice_candidate(&mut self, candidate: Value) {
        let Some(transport) = &self.transport else {
            debug!(session = %self.id, "no transport handle, dropping remote candidate");
            return;
        };
        match transport.add_ice_candidate(candidate).await {
            Ok(()) => debug!(session = %self.id, "remote candidate added"),
            // Non-fatal.
            Err(e) => warn!(session = %self.id, "failed to add remote candidate: {e:#}"),
        }
    }

    async fn remote_ended(&mut self) {
        info!(session = %self.id, "remote peer ended the call");
        // The admission flag and transport handle stay put; hangup() is the
        // only teardown path.
        self.set_state(CallState::Ended);
        self.observer.on_call_ended().await;
    }

    /// Tear down the current call. Idempotent; a late call against an
    /// already-idle session is a no-op.
    async fn hangup(&mut self) {
        if self.state == CallState::Idle && self.transport.is_none() && self.media.is_none() {
            debug!(session = %self.id, "hangup with nothing to tear down");
            return;
        }
        info!(session = %self.id, "ending call");
        self.drop_transport().await;
        self.release_media().await;
        self.in_progress = false;
        self.set_state(CallState::Idle);
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        // A continuation firing after teardown finds no handle and becomes a
        // no-op instead of acting on stale state.
        if self.transport.is_none() {
            debug!(session = %self.id, ?event, "transport event after teardown, ignoring");
            return;
        }

        match event {
            TransportEvent::CandidateGenerated(candidate) => {
                self.push_signal(SignalMessage::IceCandidate { candidate })
                    .await;
            }
            TransportEvent::Link(link) => self.link_changed(link).await,
        }
    }

    async fn link_changed(&mut self, link: LinkState) {
        info!(session = %self.id, ?link, "link state changed");
        if self.role != Role::Responder || self.state != CallState::InProgress {
            return;
        }

        match link {
            LinkState::Connected => self.observer.on_call_started().await,
            LinkState::Failed => {
                // Fatal: the handle goes away, and the admission gate opens
                // with it.
                self.drop_transport().await;
                self.in_progress = false;
                self.set_state(CallState::Failed);
                self.observer.on_call_failed().await;
            }
            LinkState::Closed => {
                self.set_state(CallState::Ended);
                self.observer.on_call_ended().await;
            }
        }
    }

    async fn push_signal(&self, msg: SignalMessage) {
        let Some(body) = msg.wire_body() else { return };
        if let Err(e) = self.channel.push(body.to_string()).await {
            error!(session = %self.id, "failed to push signal: {e:#}");
        }
    }

    async fn drop_transport(&mut self) {
        let Some(transport) = self.transport.take() else {
            return;
        };
        if let Err(e) = transport.close().await {
            warn!(session = %self.id, "transport close failed: {e:#}");
        }
    }

    async fn release_media(&mut self) {
        let Some(media) = self.media.take() else { return };
        media.stop_tracks().await;
    }

    fn set_state(&mut self, state: CallState) {
        debug!(session = %self.id, from = %self.state, to = %state, "state transition");
        self.state = state;
        let _ = self.status_tx.send(SessionStatus {
            state: self.state,
            in_progress: self.in_progress,
        });
    }
}
