use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Bits of UI state worth restoring across launches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuiState {
    /// Server URL in use when the window was closed. Used as a fallback
    /// when no config file is found on the next launch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    /// Directory open in the browser when the window was closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_height: Option<f32>,
}

impl GuiState {
    pub fn load() -> GuiState {
        match state_file_path() {
            Some(path) => Self::load_from(&path),
            None => GuiState::default(),
        }
    }

    fn load_from(path: &Path) -> GuiState {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return GuiState::default(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable gui state {}: {e}", path.display());
            GuiState::default()
        })
    }

    /// Best effort: losing window geometry is not worth surfacing an error.
    pub fn save(&self) {
        let Some(path) = state_file_path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            tracing::warn!("could not save gui state to {}: {e}", path.display());
        }
    }

    fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

fn state_file_path() -> Option<PathBuf> {
    arca_core::platform::config_dir().map(|d| d.join("arca").join("gui_state.json"))
}
