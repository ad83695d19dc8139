//! Layered configuration for the admin tool
//!
//! Settings cover where the record store lives and how long each command may
//! spend talking to it.

mod resolver;

use std::path::{Path, PathBuf};
use std::time::Duration;

use bb_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

pub use resolver::ConfigResolver;

/// Default store location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = ".blackboard/store.db";

/// Effective configuration after all layers are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub store: StoreConfig,
    pub deadlines: Deadlines,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file; relative paths resolve against the working
    /// directory.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

/// Per-command deadlines, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadlines {
    pub diff_secs: u64,
    pub sync_secs: u64,
    pub import_secs: u64,
    pub list_secs: u64,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            diff_secs: 45,
            sync_secs: 30,
            import_secs: 60,
            list_secs: 30,
        }
    }
}

impl Deadlines {
    pub fn diff(&self) -> Duration {
        Duration::from_secs(self.diff_secs)
    }

    pub fn sync(&self) -> Duration {
        Duration::from_secs(self.sync_secs)
    }

    pub fn import(&self) -> Duration {
        Duration::from_secs(self.import_secs)
    }

    pub fn list(&self) -> Duration {
        Duration::from_secs(self.list_secs)
    }
}

impl AdminConfig {
    /// Store file location, resolved against `root` when relative.
    pub fn store_path(&self, root: &NormalizedPath) -> PathBuf {
        let path = Path::new(&self.store.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(&self.store.path).to_native()
        }
    }
}

/// One configuration file; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    #[serde(default)]
    store: Option<StoreLayer>,
    #[serde(default)]
    deadlines: Option<DeadlinesLayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreLayer {
    path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeadlinesLayer {
    diff_secs: Option<u64>,
    sync_secs: Option<u64>,
    import_secs: Option<u64>,
    list_secs: Option<u64>,
}

impl AdminConfig {
    /// Apply a layer on top of the current values.
    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(store) = layer.store
            && let Some(path) = store.path
        {
            self.store.path = path;
        }
        if let Some(deadlines) = layer.deadlines {
            let current = &mut self.deadlines;
            current.diff_secs = deadlines.diff_secs.unwrap_or(current.diff_secs);
            current.sync_secs = deadlines.sync_secs.unwrap_or(current.sync_secs);
            current.import_secs = deadlines.import_secs.unwrap_or(current.import_secs);
            current.list_secs = deadlines.list_secs.unwrap_or(current.list_secs);
        }
    }
}
