mod call_state;
mod ice;
mod role;
mod session;
mod signal;

pub use call_state::CallState;
pub use ice::IceServerConfig;
pub use role::Role;
pub use session::SessionId;
pub use signal::{SdpKind, SessionSdp, SignalMessage};
