//! Scale service settings (read once at startup)
//!
//! The scale service keeps its own `settings.json`; the only key used here is
//! `scaleConnection.scaleId`.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScaleSettingsFile {
    #[serde(default)]
    scale_connection: ScaleConnection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScaleConnection {
    #[serde(default)]
    scale_id: Option<String>,
}

/// Read the scale id from the settings file at `path`.
///
/// `Ok(None)` when the file doesn't exist or has no (non-empty) id.
pub fn load_scale_id(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading scale settings {}", path.display()))?;
    let settings: ScaleSettingsFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing scale settings {}", path.display()))?;

    Ok(settings
        .scale_connection
        .scale_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty()))
}

/// Scale id from `path`, or `fallback` when unavailable
pub fn resolve_scale_id(path: &Path, fallback: &str) -> String {
    match load_scale_id(path) {
        Ok(Some(id)) => id,
        Ok(None) => {
            debug!("No scale id in {}, using {}", path.display(), fallback);
            fallback.to_string()
        }
        Err(e) => {
            warn!("Could not load scale settings: {:#}", e);
            fallback.to_string()
        }
    }
}
