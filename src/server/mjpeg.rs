//! MJPEG multipart framing and the per-connection frame loop

use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::{self, Stream};
use log::info;
use scale_stream_render::{Frame, FRAME_CONTENT_TYPE};
use std::convert::Infallible;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;

use super::state::{ServerState, StreamStats};

/// Multipart boundary name
pub const BOUNDARY: &str = "frame";

/// Content type of a stream response
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Encode one frame as a multipart part:
/// `--frame`, content type, content length, blank line, bytes, CRLF.
pub fn encode_part(frame: &Frame) -> Bytes {
    let header = format!(
        "--{}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
        BOUNDARY,
        FRAME_CONTENT_TYPE,
        frame.len()
    );

    let mut part = BytesMut::with_capacity(header.len() + frame.len() + 2);
    part.put_slice(header.as_bytes());
    part.put_slice(frame.as_bytes());
    part.put_slice(b"\r\n");
    part.freeze()
}

/// Registration of one live stream; dropping it ends the stream's bookkeeping.
///
/// The body (and this guard with it) is dropped when the peer goes away, the
/// server shuts down, or the loop ends, so every exit path is counted once.
struct ActiveStream {
    id: u64,
    stats: Arc<StreamStats>,
    _permit: OwnedSemaphorePermit,
}

impl ActiveStream {
    fn start(stats: Arc<StreamStats>, permit: OwnedSemaphorePermit) -> Self {
        let id = stats.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let active = stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        info!("MJPEG stream #{} started (active: {})", id, active);
        Self {
            id,
            stats,
            _permit: permit,
        }
    }
}

impl Drop for ActiveStream {
    fn drop(&mut self) {
        let active = self.stats.active.fetch_sub(1, Ordering::SeqCst) - 1;
        info!("MJPEG stream #{} ended (active: {})", self.id, active);
    }
}

struct StreamSession {
    state: ServerState,
    interval: Duration,
    sent: u64,
    _active: ActiveStream,
}

/// Unbounded sequence of multipart parts for one connection.
///
/// Renders a fresh frame per part and waits one frame interval after each.
/// Ends only when the server shuts down; a peer disconnect drops the stream.
pub fn frame_stream(
    state: ServerState,
    permit: OwnedSemaphorePermit,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let session = StreamSession {
        interval: state.options().frame_interval(),
        _active: ActiveStream::start(state.stream_stats(), permit),
        state,
        sent: 0,
    };

    stream::unfold(session, |mut session| async move {
        let shutdown = session.state.shutdown_token();
        if session.sent > 0 {
            tokio::select! {
                _ = shutdown.cancelled() => return None,
                _ = tokio::time::sleep(session.interval) => {}
            }
        }
        if shutdown.is_cancelled() {
            return None;
        }

        let frame = session.state.render_current().await;
        session.sent += 1;
        Some((Ok(encode_part(&frame)), session))
    })
}
