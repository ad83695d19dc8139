//! Per-invocation session: working directory, resolved config, open store

use std::path::PathBuf;
use std::time::Duration;

use bb_core::{AdminConfig, ConfigResolver};
use bb_fs::NormalizedPath;
use bb_store::{CallContext, SqliteStore};

use crate::error::Result;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub store: Option<String>,
    pub config_dir: Option<PathBuf>,
}

/// Everything a command needs once its arguments are valid.
pub struct Session {
    pub root: NormalizedPath,
    pub config: AdminConfig,
    pub store: SqliteStore,
}

impl Session {
    /// Resolve configuration for `cwd` and open the configured store.
    pub fn open(cwd: &std::path::Path, globals: &GlobalArgs) -> Result<Self> {
        let root = NormalizedPath::new(cwd);
        let resolver = match &globals.config_dir {
            Some(dir) => ConfigResolver::with_global_config_dir(root.clone(), dir.clone()),
            None => ConfigResolver::new(root.clone()),
        };
        let config = resolver.with_store_override(globals.store.clone()).resolve()?;

        let store_path = config.store_path(&root);
        tracing::debug!(store = %store_path.display(), "opening store");
        let store = SqliteStore::open(&store_path)?;

        Ok(Self {
            root,
            config,
            store,
        })
    }

    /// A call context expiring after `timeout`.
    pub fn context(&self, timeout: Duration) -> CallContext {
        CallContext::with_timeout(timeout)
    }
}
