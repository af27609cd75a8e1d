mod peer_transport;
mod rtc;
mod transport_config;
mod transport_event;

pub use peer_transport::*;
pub use rtc::*;
pub use transport_config::*;
pub use transport_event::*;
