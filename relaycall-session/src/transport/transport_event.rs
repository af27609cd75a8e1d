use serde_json::Value;

/// Connectivity of the established media link, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Failed,
    Closed,
}

/// Events the media transport feeds back into the session loop.
#[derive(Debug)]
pub enum TransportEvent {
    /// A local candidate is ready to be relayed to the remote peer.
    CandidateGenerated(Value),
    Link(LinkState),
}
