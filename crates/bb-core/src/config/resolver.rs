//! Configuration resolution with layered merge
//!
//! The `ConfigResolver` loads configuration from several sources, with later
//! sources overriding earlier ones.

use std::path::PathBuf;

use bb_fs::{DocumentStore, NormalizedPath};

use super::{AdminConfig, ConfigLayer};
use crate::{Error, Result};

/// Application directory under the platform config dir.
const APP_DIR: &str = "blackboard-admin";

/// Workspace configuration, relative to the working directory.
const WORKSPACE_CONFIG: &str = ".blackboard/config.toml";

/// Resolves configuration by merging multiple sources
///
/// Layers, in order:
/// 1. Built-in defaults
/// 2. Global config (`<config_dir>/blackboard-admin/config.toml`)
/// 3. Workspace config (`.blackboard/config.toml`)
/// 4. Explicit store override (`--store` / `BBADMIN_STORE`)
///
/// Missing files are skipped. Invalid TOML or unknown keys are errors.
pub struct ConfigResolver {
    /// Working directory containing `.blackboard/`
    root: NormalizedPath,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,

    store_override: Option<String>,
}

impl ConfigResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            global_config_dir_override: None,
            store_override: None,
        }
    }

    /// Create a resolver with a custom global config directory.
    pub fn with_global_config_dir(root: NormalizedPath, global_config_dir: PathBuf) -> Self {
        Self {
            root,
            global_config_dir_override: Some(global_config_dir),
            store_override: None,
        }
    }

    /// Use `path` as the store location regardless of config files.
    pub fn with_store_override(mut self, path: Option<String>) -> Self {
        self.store_override = path.filter(|p| !p.trim().is_empty());
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    /// Path of the workspace configuration file.
    pub fn workspace_config_path(&self) -> NormalizedPath {
        self.root.join(WORKSPACE_CONFIG)
    }

    pub fn resolve(&self) -> Result<AdminConfig> {
        let mut config = AdminConfig::default();

        if let Some(dir) = self.global_config_dir() {
            let path = NormalizedPath::new(dir.join("config.toml"));
            if let Some(layer) = load_layer(&path)? {
                tracing::debug!(path = %path, "applying global config");
                config.merge(layer);
            }
        }

        let workspace = self.workspace_config_path();
        if let Some(layer) = load_layer(&workspace)? {
            tracing::debug!(path = %workspace, "applying workspace config");
            config.merge(layer);
        }

        if let Some(ref store) = self.store_override {
            config.store.path = store.clone();
        }
        Ok(config)
    }
}

fn load_layer(path: &NormalizedPath) -> Result<Option<ConfigLayer>> {
    DocumentStore::new()
        .load_optional(path)
        .map_err(|err| match err {
            bb_fs::Error::Parse { path, message, .. } => Error::Config { path, message },
            other => Error::Fs(other),
        })
}
