//! HTTP server: landing page, snapshots and MJPEG streams
//!
//! Every request renders from the current [`StatusStore`] snapshot; nothing is
//! cached between requests. Streams stop when the shutdown token fires, which
//! lets [`serve`] drain and return.
//!
//! [`StatusStore`]: scale_stream_core::StatusStore

mod error;
mod mjpeg;
mod routes;
mod state;

pub use error::ServerError;
pub use mjpeg::{encode_part, BOUNDARY, MULTIPART_CONTENT_TYPE};
pub use state::{ServerState, StreamOptions};

use axum::{middleware, routing::get, Router};
use log::info;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the router for `state`
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(routes::landing_page))
        .route("/stream", get(routes::stream))
        .route("/mjpeg", get(routes::stream))
        .route("/snapshot", get(routes::snapshot))
        .route("/snapshot.jpg", get(routes::snapshot))
        .fallback(routes::not_found)
        .layer(middleware::from_fn(routes::log_request))
        .with_state(state)
}

/// Bind the listening socket
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve until the state's shutdown token is cancelled
pub async fn serve(listener: TcpListener, state: ServerState) -> Result<(), ServerError> {
    let shutdown = state.shutdown_token();
    let app = build_router(state);

    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Server stopped");
    Ok(())
}
