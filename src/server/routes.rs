//! Request handlers

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use log::{debug, warn};
use scale_stream_render::{FOOTER_CAPTION, FRAME_CONTENT_TYPE};

use super::mjpeg::{frame_stream, MULTIPART_CONTENT_TYPE};
use super::state::ServerState;

/// `GET /`
pub async fn landing_page(State(state): State<ServerState>) -> Html<String> {
    Html(landing_html(state.options().port))
}

fn landing_html(port: u16) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Scale Streamer</title>
<style>
body {{ background: #19232f; color: #ddd; font-family: sans-serif; text-align: center; margin: 0; padding: 20px; }}
img {{ max-width: 100%; border: 1px solid #333; }}
code {{ color: #fff; }}
</style>
</head>
<body>
<h1>{caption}</h1>
<img src="/stream" alt="Live weight display">
<p>MJPEG stream: <code>http://&lt;host&gt;:{port}/stream</code></p>
<p>Snapshot: <code>http://&lt;host&gt;:{port}/snapshot</code></p>
</body>
</html>
"#,
        port = port,
        caption = FOOTER_CAPTION
    )
}

/// `GET /snapshot`, `GET /snapshot.jpg`
pub async fn snapshot(State(state): State<ServerState>) -> Response {
    let frame = state.render_current().await;
    let len = frame.len();
    (
        [
            (header::CONTENT_TYPE, FRAME_CONTENT_TYPE.to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        Body::from(frame.into_bytes()),
    )
        .into_response()
}

/// `GET /stream`, `GET /mjpeg`
pub async fn stream(State(state): State<ServerState>) -> Response {
    let Some(permit) = state.try_acquire_stream() else {
        warn!(
            "Rejecting stream: limit of {} reached",
            state.options().max_streams
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "Too many streams\n").into_response();
    };

    let body = Body::from_stream(frame_stream(state, permit));
    (
        [
            (header::CONTENT_TYPE, MULTIPART_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found\n")
}

/// Logs each request path at debug level
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    debug!("{} {} -> {}", method, path, response.status().as_u16());
    response
}
