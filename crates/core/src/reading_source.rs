//! Reading source trait

use scale_stream_types::Reading;
use std::sync::Arc;

/// Trait for all reading sources
///
/// A reading source knows how to find the most recent scale reading in some
/// external system (a log file, a serial port, ...). It is polled from a
/// blocking context, so implementations may do synchronous I/O.
pub trait ReadingSource: Send + Sync {
    /// Short human-readable description used in log messages
    fn describe(&self) -> String;

    /// Latest reading, or `None` when nothing usable is available right now.
    ///
    /// Implementations must not fail: unavailable data, I/O errors and
    /// unparsable content are all reported as `None`, and the caller keeps
    /// whatever it had before.
    fn fetch_latest(&self) -> Option<Reading>;
}

/// Type-erased reading source shared with the poller's blocking tasks
pub type SharedReadingSource = Arc<dyn ReadingSource>;
