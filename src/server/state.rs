//! Shared server state handed to every request

use log::error;
use scale_stream_core::{frame_interval, StatusStore, DEFAULT_FPS, DEFAULT_MAX_STREAMS, DEFAULT_PORT};
use scale_stream_render::{Frame, SharedRenderer};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Per-server stream settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Port shown on the landing page
    pub port: u16,
    pub fps: u32,
    pub max_streams: usize,
}

impl StreamOptions {
    pub fn frame_interval(&self) -> Duration {
        frame_interval(self.fps)
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            fps: DEFAULT_FPS,
            max_streams: DEFAULT_MAX_STREAMS,
        }
    }
}

/// Stream counters shared by all connections
#[derive(Debug, Default)]
pub(crate) struct StreamStats {
    pub(crate) active: AtomicUsize,
    pub(crate) next_id: AtomicU64,
}

/// Cheaply clonable handle to everything a handler needs
#[derive(Clone)]
pub struct ServerState {
    store: Arc<StatusStore>,
    renderer: SharedRenderer,
    options: StreamOptions,
    stream_slots: Arc<Semaphore>,
    stats: Arc<StreamStats>,
    shutdown: CancellationToken,
}

impl ServerState {
    pub fn new(
        store: Arc<StatusStore>,
        renderer: SharedRenderer,
        options: StreamOptions,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            renderer,
            stream_slots: Arc::new(Semaphore::new(options.max_streams.max(1))),
            options,
            stats: Arc::new(StreamStats::default()),
            shutdown,
        }
    }

    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Number of MJPEG streams currently being served
    pub fn active_streams(&self) -> usize {
        self.stats.active.load(Ordering::SeqCst)
    }

    pub(crate) fn stream_stats(&self) -> Arc<StreamStats> {
        self.stats.clone()
    }

    /// Claim a stream slot, `None` when all slots are taken
    pub(crate) fn try_acquire_stream(&self) -> Option<OwnedSemaphorePermit> {
        self.stream_slots.clone().try_acquire_owned().ok()
    }

    /// Render a frame from the current snapshot on the blocking pool.
    ///
    /// Falls back to the placeholder if the render task itself fails.
    pub async fn render_current(&self) -> Frame {
        let record = self.store.snapshot();
        let renderer = self.renderer.clone();
        match tokio::task::spawn_blocking(move || renderer.render(&record)).await {
            Ok(frame) => frame,
            Err(e) => {
                error!("Render task failed: {}", e);
                Frame::placeholder()
            }
        }
    }
}
