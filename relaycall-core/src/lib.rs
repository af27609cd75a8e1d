pub mod model;
pub mod router;

pub use model::{CallState, IceServerConfig, Role, SdpKind, SessionId, SessionSdp, SignalMessage};
pub use router::{classify, route};
