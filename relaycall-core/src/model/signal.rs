use serde_json::{Value, json};

/// Which half of the description exchange a blob belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

impl SdpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdpKind::Offer => "offer",
            SdpKind::Answer => "answer",
        }
    }
}

/// A session description as carried on the wire: the full `sdp` object is
/// kept opaque so fields the transport adds survive the round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSdp {
    pub kind: SdpKind,
    pub blob: Value,
}

impl SessionSdp {
    pub fn new(kind: SdpKind, sdp: impl Into<String>) -> Self {
        Self {
            blob: json!({ "type": kind.as_str(), "sdp": sdp.into() }),
            kind,
        }
    }

    /// The raw description text, if the blob carries one.
    pub fn sdp(&self) -> Option<&str> {
        self.blob.get("sdp").and_then(Value::as_str)
    }
}

/// Everything a relay channel message can mean to a call session.
///
/// The wire format is presence-keyed (one JSON object, recognized by which
/// field it carries), so this does not derive a serde tag; see
/// [`crate::router::classify`] for the inbound direction and [`wire_body`]
/// for the outbound one.
///
/// [`wire_body`]: SignalMessage::wire_body
#[derive(Debug, Clone, PartialEq)]
pub enum SignalMessage {
    /// A proposed network path, opaque to signaling.
    IceCandidate { candidate: Value },
    /// An offer or answer description.
    Description(SessionSdp),
    /// Ask the remote Initiator to start a call.
    ParticipationRequest { broadcaster_id: String },
    /// The remote side ended the call.
    CallEnded,
    /// Anything unrecognized. Not an error.
    Unknown,
}

impl SignalMessage {
    /// Outbound wire body. `Unknown` has no wire form.
    pub fn wire_body(&self) -> Option<Value> {
        match self {
            SignalMessage::IceCandidate { candidate } => {
                Some(json!({ "candidate": candidate }))
            }
            SignalMessage::Description(desc) => Some(json!({ "sdp": desc.blob })),
            SignalMessage::ParticipationRequest { broadcaster_id } => Some(json!({
                "request_participation": true,
                "broadcaster_id": broadcaster_id,
            })),
            SignalMessage::CallEnded => Some(json!({ "callEnded": true })),
            SignalMessage::Unknown => None,
        }
    }
}
