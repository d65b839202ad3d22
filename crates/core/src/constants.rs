//! Shared constants for the application

use std::time::Duration;

/// How often the poller asks the reading source for the latest value (5 Hz)
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Frames per second sent on each MJPEG stream
pub const DEFAULT_FPS: u32 = 10;

/// HTTP port the stream server listens on
pub const DEFAULT_PORT: u16 = 8555;

/// Upper bound on simultaneous `/stream` connections
pub const DEFAULT_MAX_STREAMS: usize = 32;

/// Delay between two frames of a stream running at `fps`.
///
/// A zero rate is treated as 1 fps.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}
