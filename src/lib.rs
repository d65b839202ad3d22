//! scale-stream: live weight display served as an MJPEG stream
//!
//! This library provides:
//! - Application configuration and scale settings
//! - The HTTP server (landing page, snapshots, MJPEG streams)
//! - Wiring that connects the log-tail source, poller and renderer

pub mod app;
pub mod config;
pub mod server;

// Re-export commonly used types
pub use app::App;
pub use config::AppConfig;
pub use server::{ServerError, ServerState, StreamOptions};
