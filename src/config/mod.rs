//! Configuration module for websearch-rs
//!
//! Handles loading settings from YAML files and environment variables.
//! Loading happens before logging is set up, so the chosen file is returned
//! to the caller for reporting.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;

/// Load settings from the first settings file found, or use defaults.
///
/// Returns the settings together with the file they came from.
pub fn load() -> Result<(Settings, Option<PathBuf>)> {
    let mut candidates = Vec::new();

    // Check environment variable first
    if let Ok(path) = std::env::var("WEBSEARCH_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("websearch-rs/settings.yml"));
    }

    let source = candidates.into_iter().find(|path| path.is_file());
    let mut settings = match source {
        Some(ref path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    settings.merge_env();
    settings.validate()?;

    Ok((settings, source))
}
