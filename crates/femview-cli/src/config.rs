//! `femview.toml` loading.
//!
//! The default file lives in the platform configuration folder:
//! - Linux: ~/.config/femview/
//! - macOS: ~/Library/Application Support/org.femview.femview/
//! - Windows: %APPDATA%/femview/femview/config/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use femview_interp::SessionConfig;
use femview_model::BlockSpec;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "femview";
const APP_NAME: &str = "femview";
const CONFIG_FILENAME: &str = "femview.toml";

/// The `[session]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    pub history_capacity: usize,
    pub loop_limit: usize,
    pub echo: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        let defaults = SessionConfig::default();
        Self {
            history_capacity: defaults.history_capacity,
            loop_limit: defaults.loop_limit,
            echo: defaults.echo,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionSection,
    pub mesh: BlockSpec,
}

impl Config {
    pub fn session_config(&self, batch: bool) -> SessionConfig {
        SessionConfig {
            history_capacity: self.session.history_capacity,
            loop_limit: self.session.loop_limit,
            batch,
            echo: self.session.echo,
        }
    }
}

/// Path of the per-user configuration file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("invalid femview configuration")
}

/// Load the configuration.
///
/// An explicit path must exist. The per-user file is optional and defaults
/// apply when it is missing.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config = parse_config(&content).with_context(|| format!("in {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        return Ok(config);
    }

    let Some(path) = default_config_path() else {
        tracing::debug!("no configuration directory on this platform, using defaults");
        return Ok(Config::default());
    };
    match fs::read_to_string(&path) {
        Ok(content) => {
            let config = parse_config(&content).with_context(|| format!("in {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}
