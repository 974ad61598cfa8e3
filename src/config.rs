//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeindex/treeindex.toml`
//! 3. Local config: `<dir>/.treeindex.toml`
//! 4. Environment variables: `TREEINDEX_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{DuplicatePolicy, FlatFields, IdGenerator, IdStrategy, Tree, TreeIndex};

/// Raw flat field names for intermediate parsing (`None` → inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFlatFields {
    pub id_field: Option<String>,
    pub label_field: Option<String>,
    pub parent_field: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub flat: RawFlatFields,
    pub id_strategy: Option<IdStrategy>,
    pub id_prefix: Option<String>,
    pub duplicate_ids: Option<DuplicatePolicy>,
}

/// Unified configuration for treeindex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How ids are synthesized for items added without one
    pub id_strategy: IdStrategy,
    /// Prefix of sequential ids (default: "item-")
    pub id_prefix: String,
    /// Whether duplicate ids are rejected
    pub duplicate_ids: DuplicatePolicy,
    /// Column names of flat record lists
    pub flat: FlatFields,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            id_prefix: "item-".into(),
            duplicate_ids: DuplicatePolicy::default(),
            flat: FlatFields::default(),
        }
    }
}

/// Get the XDG config directory for treeindex.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeindex").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeindex.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treeindex.toml")
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            flat: FlatFields {
                id_field: overlay
                    .flat
                    .id_field
                    .clone()
                    .unwrap_or_else(|| self.flat.id_field.clone()),
                label_field: overlay
                    .flat
                    .label_field
                    .clone()
                    .unwrap_or_else(|| self.flat.label_field.clone()),
                parent_field: overlay
                    .flat
                    .parent_field
                    .clone()
                    .unwrap_or_else(|| self.flat.parent_field.clone()),
            },
            id_strategy: overlay.id_strategy.unwrap_or(self.id_strategy),
            id_prefix: overlay
                .id_prefix
                .clone()
                .unwrap_or_else(|| self.id_prefix.clone()),
            duplicate_ids: overlay.duplicate_ids.unwrap_or(self.duplicate_ids),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treeindex.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global file instead of the XDG location.
    pub fn load_layers(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("config: global {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("config: local {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply TREEINDEX_* environment variables, e.g. `TREEINDEX_FLAT__LABEL_FIELD=name`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEINDEX")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("flat.id_field") {
            settings.flat.id_field = val;
        }
        if let Ok(val) = config.get_string("flat.label_field") {
            settings.flat.label_field = val;
        }
        if let Ok(val) = config.get_string("flat.parent_field") {
            settings.flat.parent_field = val;
        }
        if let Ok(val) = config.get_string("id_prefix") {
            settings.id_prefix = val;
        }
        if let Ok(val) = config.get_string("id_strategy") {
            settings.id_strategy = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("duplicate_ids") {
            settings.duplicate_ids = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }

        Ok(settings)
    }

    /// Empty index using the configured id strategy and duplicate policy.
    pub fn index(&self) -> TreeIndex<Box<dyn IdGenerator>> {
        TreeIndex::with_generator(Tree::new(), self.id_strategy.generator(&self.id_prefix))
            .with_policy(self.duplicate_ids)
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
