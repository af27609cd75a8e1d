use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use webrtc::track::track_local::TrackLocal;

/// What to ask the capture service for. Audio-only by default.
#[derive(Debug, Clone, Copy)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }
}

/// A captured local media stream, exclusively owned by the session that
/// acquired it.
#[async_trait]
pub trait MediaStream: Send + Sync {
    /// Local tracks to feed into the peer transport.
    fn tracks(&self) -> Vec<Arc<dyn TrackLocal + Send + Sync>>;

    /// Stop every track. Invoked on hangup.
    async fn stop_tracks(&self);
}

/// Media acquisition service (microphone/camera, a file source in tests).
#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn acquire(&self, constraints: &MediaConstraints) -> Result<Box<dyn MediaStream>>;
}
