//! Configuration management

mod scale_settings;
mod settings;

pub use scale_settings::{load_scale_id, resolve_scale_id};
pub use settings::{AppConfig, ServerConfig, SourceConfig};
