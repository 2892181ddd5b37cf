// Settings and the log file live under <dir>/.jamify/. Loaded on startup,
// saved on quit.

use std::path::{Path, PathBuf};

use log::debug;

use super::settings::Settings;
use crate::error::{JamifyError, Result};

const JAMIFY_DIR: &str = ".jamify";
const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "jamify.log";

pub fn jamify_dir(dir: &Path) -> PathBuf {
    dir.join(JAMIFY_DIR)
}

// <dir>/.jamify/settings.json
pub fn settings_file_path(dir: &Path) -> PathBuf {
    jamify_dir(dir).join(SETTINGS_FILE)
}

pub fn log_file_path(dir: &Path) -> PathBuf {
    jamify_dir(dir).join(LOG_FILE)
}

pub fn load_settings(dir: &Path) -> Result<Settings> {
    let path = settings_file_path(dir);
    let data = std::fs::read_to_string(&path).map_err(|source| JamifyError::Io {
        path: path.clone(),
        source,
    })?;
    let settings = serde_json::from_str(&data)?;
    debug!("settings loaded from {}", path.display());
    Ok(settings)
}

// creates .jamify/ if it isn't there yet
pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    let path = settings_file_path(dir);
    ensure_parent(&path)?;
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, json).map_err(|source| JamifyError::Io { path: path.clone(), source })?;
    debug!("settings saved to {}", path.display());
    Ok(())
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| JamifyError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
