//! scale-stream-core: Shared state and scheduling for scale-stream.
//!
//! This crate owns the process-wide [`StatusStore`], the [`ReadingSource`]
//! trait implemented by reading adapters, the [`Poller`] that connects the
//! two, and shared constants.

pub mod constants;
mod poller;
mod reading_source;
mod status_store;

pub use constants::{
    frame_interval, DEFAULT_FPS, DEFAULT_MAX_STREAMS, DEFAULT_PORT, POLL_INTERVAL,
};
pub use poller::Poller;
pub use reading_source::{ReadingSource, SharedReadingSource};
pub use status_store::StatusStore;

// Re-export types used in trait signatures for convenience
pub use scale_stream_types::{Reading, ReadingStatus, StatusRecord};
