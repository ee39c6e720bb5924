//! Project-level configuration support
//!
//! Loads `git-stamps.toml` from the project root. Every field is optional;
//! command line flags win over the file, and the file wins over built-in
//! defaults.
//!
//! # Configuration Format
//!
//! ```toml
//! # git-stamps.toml
//!
//! [defaults]
//! output_file = "timestamps.json"
//! output_to_file = true
//! hook = "pre"
//! only_in = ["content/"]
//! block = ["*.lock"]
//! allow = ["*.md"]
//! ```

use crate::models::HookMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "git-stamps.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliDefaults {
    /// Cache file name, relative to the project root
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Write the cache file instead of printing the mapping
    #[serde(default)]
    pub output_to_file: Option<bool>,

    /// Commit hook the tool is normally invoked from
    #[serde(default)]
    pub hook: Option<HookMode>,

    /// Restrict the walk to these directories
    #[serde(default)]
    pub only_in: Vec<PathBuf>,

    /// Glob patterns to exclude
    #[serde(default)]
    pub block: Vec<String>,

    /// Glob patterns to include exclusively
    #[serde(default)]
    pub allow: Vec<String>,
}

/// Load project configuration from the project root.
///
/// Returns the default configuration if the file is absent or invalid.
pub fn load_project_config(project_root: &Path) -> ProjectConfig {
    let toml_path = project_root.join(CONFIG_FILE_NAME);
    if !toml_path.exists() {
        debug!("No project config found, using defaults");
        return ProjectConfig::default();
    }
    match load_toml_config(&toml_path) {
        Ok(config) => {
            debug!("Loaded project config from {}", toml_path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", toml_path.display(), e);
            ProjectConfig::default()
        }
    }
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}
