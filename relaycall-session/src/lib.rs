pub mod channel;
pub mod error;
pub mod media;
pub mod observer;
pub mod session;
pub mod transport;

pub use channel::RelayChannel;
pub use error::CallError;
pub use media::{MediaCapture, MediaConstraints, MediaStream};
pub use observer::LifecycleObserver;
pub use session::{CallSession, SessionCommand, SessionConfig, SessionHandle, SessionStatus};
pub use transport::{
    LinkState, PeerTransport, RtcTransportFactory, TransportConfig, TransportEvent,
    TransportFactory,
};
