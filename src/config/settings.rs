//! Application configuration

use anyhow::{Context, Result};
use scale_stream_core::{DEFAULT_FPS, DEFAULT_MAX_STREAMS, DEFAULT_PORT, POLL_INTERVAL};
use scale_stream_render::RendererKind;
use scale_stream_types::DEFAULT_SCALE_ID;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Where readings come from
    #[serde(default)]
    pub source: SourceConfig,
    /// Renderer selection
    #[serde(default)]
    pub renderer: RendererKind,
    /// Scale id used when the scale settings file doesn't provide one
    #[serde(default = "default_scale_id")]
    pub default_scale_id: String,
}

fn default_scale_id() -> String {
    DEFAULT_SCALE_ID.to_string()
}

impl AppConfig {
    /// Load configuration from disk
    ///
    /// A missing config file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.server.bind_address))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.source.poll_interval_ms.max(1))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            source: SourceConfig::default(),
            renderer: RendererKind::default(),
            default_scale_id: default_scale_id(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Frames per second on each stream
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Maximum simultaneous stream connections
    #[serde(default = "default_max_streams")]
    pub max_streams: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_max_streams() -> usize {
    DEFAULT_MAX_STREAMS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            fps: default_fps(),
            max_streams: default_max_streams(),
        }
    }
}

/// Reading source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding the scale service's daily logs
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Scale service settings file (provides the scale id)
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "cloud-scale", "scale-stream")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn default_settings_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL.as_millis() as u64
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            settings_path: default_settings_path(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
