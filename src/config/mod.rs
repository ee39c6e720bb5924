//! Configuration module for git-stamps
//!
//! This module handles:
//! - Project-level configuration (git-stamps.toml)
//! - CLI defaults

mod project_config;

pub use project_config::{load_project_config, CliDefaults, ProjectConfig, CONFIG_FILE_NAME};
