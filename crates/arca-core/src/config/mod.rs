mod defaults;
mod types;

use std::path::{Path, PathBuf};

use crate::error::{ArcaError, Result};
use crate::platform;

pub use self::types::{ArcaConfig, DirInfoConfig, ServerConfig};

/// Candidate config locations, most specific first.
pub fn default_config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = platform::config_dir() {
        paths.push(dir.join("arca").join("arca.yaml"));
    }
    paths.push(PathBuf::from("arca.yaml"));
    paths
}

/// Load the application config.
///
/// With an explicit `path` the file must exist and parse. Without one, the
/// search paths are probed in order; if none exists the built-in defaults are
/// used so the client can still start and point at a local server.
pub fn load(path: Option<&Path>) -> Result<(ArcaConfig, Option<PathBuf>)> {
    let found = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ArcaError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p.to_path_buf())
        }
        None => default_config_search_paths().into_iter().find(|p| p.exists()),
    };

    let config = match &found {
        Some(p) => parse_file(p)?,
        None => {
            tracing::info!("no config file found, using built-in defaults");
            ArcaConfig::default()
        }
    };

    config.dir_info.validate()?;
    Ok((config, found))
}

fn parse_file(path: &Path) -> Result<ArcaConfig> {
    let raw = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&raw).map_err(|e| {
        ArcaError::Config(format!("failed to parse {}: {e}", path.display()))
    })
}
