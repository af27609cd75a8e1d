use serde_json::Value;
use tracing::debug;

use crate::model::{CallState, Role, SdpKind, SessionSdp, SignalMessage};

/// Classify a raw relay payload. Total: unparsable or unrecognized input
/// maps to [`SignalMessage::Unknown`], never to an error.
///
/// Recognition order matches the wire contract: `candidate`, `callEnded`,
/// `request_participation`, then an `sdp` object with a known `type`.
pub fn classify(raw: &str) -> SignalMessage {
    let Ok(body) = serde_json::from_str::<Value>(raw) else {
        return SignalMessage::Unknown;
    };

    if let Some(candidate) = body.get("candidate") {
        if !candidate.is_null() {
            return SignalMessage::IceCandidate {
                candidate: candidate.clone(),
            };
        }
    }

    if body.get("callEnded").and_then(Value::as_bool) == Some(true) {
        return SignalMessage::CallEnded;
    }

    if body.get("request_participation").and_then(Value::as_bool) == Some(true) {
        let broadcaster_id = body
            .get("broadcaster_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return SignalMessage::ParticipationRequest { broadcaster_id };
    }

    if let Some(sdp) = body.get("sdp") {
        let kind = match sdp.get("type").and_then(Value::as_str) {
            Some("offer") => SdpKind::Offer,
            Some("answer") => SdpKind::Answer,
            _ => return SignalMessage::Unknown,
        };
        return SignalMessage::Description(SessionSdp {
            kind,
            blob: sdp.clone(),
        });
    }

    SignalMessage::Unknown
}

/// Role- and state-gated dispatch. This single match is the routing
/// contract: a message is either forwarded to the session or dropped.
///
/// Candidates pass in any state (the session drops them itself when no
/// transport handle exists). An answer is accepted only by an Initiator
/// that is already in a call, i.e. only after an offer actually went out.
/// Everything else is admitted in `Idle` only, which is what rejects a
/// second negotiation while one is in flight.
pub fn route(msg: SignalMessage, role: Role, state: CallState) -> Option<SignalMessage> {
    use CallState::{Idle, InProgress};
    use Role::{Initiator, Responder};

    match (&msg, role, state) {
        (SignalMessage::IceCandidate { .. }, _, _) => Some(msg),
        (SignalMessage::CallEnded, Responder, InProgress) => Some(msg),
        (SignalMessage::ParticipationRequest { .. }, Initiator, Idle) => Some(msg),
        (SignalMessage::Description(d), Responder, Idle) if d.kind == SdpKind::Offer => Some(msg),
        (SignalMessage::Description(d), Initiator, InProgress) if d.kind == SdpKind::Answer => {
            Some(msg)
        }
        _ => {
            debug!(%role, %state, ?msg, "dropping signal");
            None
        }
    }
}
