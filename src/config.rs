//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/axnav/axnav.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `AXNAV_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::util::path::{expand_path, PathExt};

/// Default restriction flags for `walk`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WalkConfig {
    /// Do not descend into the start node
    pub skip_initial_subtree: bool,
    /// Do not report ancestors of the start node on backward walks
    pub skip_initial_ancestry: bool,
}

/// Raw walk config for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawWalkConfig {
    pub skip_initial_subtree: Option<bool>,
    pub skip_initial_ancestry: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub snapshot_dir: Option<PathBuf>,
    pub max_results: Option<usize>,
    pub color: Option<bool>,
    pub walk: RawWalkConfig,
}

impl WalkConfig {
    fn merge(&self, overlay: &RawWalkConfig) -> Self {
        Self {
            skip_initial_subtree: overlay
                .skip_initial_subtree
                .unwrap_or(self.skip_initial_subtree),
            skip_initial_ancestry: overlay
                .skip_initial_ancestry
                .unwrap_or(self.skip_initial_ancestry),
        }
    }
}

/// Unified configuration for axnav.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Where bare snapshot names are looked up (default: ~/.axnav/snapshots)
    pub snapshot_dir: PathBuf,
    /// Upper bound on nodes printed by `walk` and `all`
    pub max_results: usize,
    /// Colored terminal output
    pub color: bool,
    /// Walk defaults
    pub walk: WalkConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            max_results: 200,
            color: true,
            walk: WalkConfig::default(),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".axnav").join("snapshots"))
        .unwrap_or_else(|| PathBuf::from("~/.axnav/snapshots"))
}

/// Get the XDG config directory for axnav.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "axnav").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("axnav.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_path(&self.snapshot_dir.to_string_lossy_owned());
        self.snapshot_dir = PathBuf::from(expanded);
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            snapshot_dir: overlay
                .snapshot_dir
                .clone()
                .unwrap_or_else(|| self.snapshot_dir.clone()),
            max_results: overlay.max_results.unwrap_or(self.max_results),
            color: overlay.color.unwrap_or(self.color),
            walk: self.walk.merge(&overlay.walk),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/axnav/axnav.toml`
    /// 3. `config_path`, when given (must exist)
    /// 4. Environment variables: `AXNAV_*` prefix
    pub fn load(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_path {
            debug!("explicit config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply AXNAV_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `AXNAV_WALK__SKIP_INITIAL_SUBTREE`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("AXNAV")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("snapshot_dir") {
            settings.snapshot_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<usize>("max_results") {
            settings.max_results = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }
        if let Ok(val) = config.get_bool("walk.skip_initial_subtree") {
            settings.walk.skip_initial_subtree = val;
        }
        if let Ok(val) = config.get_bool("walk.skip_initial_ancestry") {
            settings.walk.skip_initial_ancestry = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# axnav configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/axnav/axnav.toml
#   Explicit: axnav --config <file>
#   Env:      AXNAV_* environment variables (AXNAV_WALK__SKIP_INITIAL_SUBTREE=true)

# Directory searched for bare snapshot names
# snapshot_dir = "~/.axnav/snapshots"

# Maximum number of nodes printed by walk/all
# max_results = 200

# Colored output (NO_COLOR is honoured regardless)
# color = true

[walk]
# skip_initial_subtree = false
# skip_initial_ancestry = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
