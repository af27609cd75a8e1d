use relaycall_core::CallState;
use tokio::sync::{mpsc, watch};
use tracing::warn;

use crate::session::SessionCommand;

/// Host-visible snapshot of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: CallState,
    /// The single-admission negotiation gate. While set, no further
    /// negotiation is admitted.
    pub in_progress: bool,
}

/// Cheap, cloneable front for a running [`crate::CallSession`]. Commands
/// never return errors to the caller; failures surface in the session log.
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    status_rx: watch::Receiver<SessionStatus>,
}

impl SessionHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<SessionCommand>,
        status_rx: watch::Receiver<SessionStatus>,
    ) -> Self {
        Self { cmd_tx, status_rx }
    }

    pub async fn request_participation(&self, broadcaster_id: impl Into<String>) {
        self.send(SessionCommand::RequestParticipation {
            broadcaster_id: broadcaster_id.into(),
        })
        .await;
    }

    pub async fn call(&self) {
        self.send(SessionCommand::Call).await;
    }

    pub async fn hangup(&self) {
        self.send(SessionCommand::Hangup).await;
    }

    pub fn status(&self) -> SessionStatus {
        *self.status_rx.borrow()
    }

    /// A watch receiver for observing state transitions as they happen.
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.status_rx.clone()
    }

    async fn send(&self, cmd: SessionCommand) {
        if let Err(e) = self.cmd_tx.send(cmd).await {
            warn!("session loop is gone, dropping command: {e}");
        }
    }
}
