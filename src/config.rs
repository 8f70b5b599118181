//! Configuration for jsonkv
//!
//! Centralized configuration with sensible defaults, plus resolution of
//! where the storage file lives.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, StoreError};

/// Environment variable consulted first when resolving the storage directory
pub const DEFAULT_ENV_VAR: &str = "STORAGE_DIR";

/// File name used inside an explicit or per-user storage directory
pub const STORAGE_FILENAME: &str = "storage";

/// Main configuration for a store handle
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Logical store name. Used for the per-user directory (`~/.<name>`)
    /// and for the env-var file name (`<dir>/ss_<name>`).
    pub name: String,

    /// Explicit storage directory. The file is `{storage_dir}/storage`.
    pub storage_dir: Option<PathBuf>,

    /// Environment variable that overrides everything else when set.
    /// `None` disables the lookup.
    pub env_var: Option<String>,

    // -------------------------------------------------------------------------
    // Notification Configuration
    // -------------------------------------------------------------------------
    /// How a broadcast treats subscribers that are not ready
    pub broadcast_policy: BroadcastPolicy,

    /// Whether to start the change watcher at all
    pub watch: bool,

    /// Window in which consecutive file events collapse into one reload
    pub watch_debounce: Duration,
}

/// Broadcast delivery policy for slow or absent subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastPolicy {
    /// One-slot buffer per subscriber; a signal is dropped when one is
    /// already pending. Never blocks.
    Coalesce,

    /// Rendezvous delivery, waiting at most this long per subscriber
    Timeout(Duration),

    /// Rendezvous delivery, waiting forever. A subscriber that never reads
    /// stalls every later save and reload.
    Block,
}

impl Default for BroadcastPolicy {
    fn default() -> Self {
        BroadcastPolicy::Coalesce
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "jsonkv".to_string(),
            storage_dir: None,
            env_var: Some(DEFAULT_ENV_VAR.to_string()),
            broadcast_policy: BroadcastPolicy::default(),
            watch: true,
            watch_debounce: Duration::from_millis(50),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve the storage file path against the real process environment
    pub fn resolve_storage_file(&self) -> Result<PathBuf> {
        self.resolve_storage_file_with(|var| std::env::var(var).ok())
    }

    /// Resolve the storage file path using `lookup` for environment variables
    ///
    /// Priority:
    /// 1. `env_var` set and non-empty -> `<dir>/ss_<name>`
    /// 2. `storage_dir` -> `<dir>/storage`
    /// 3. `$HOME/.<name>/storage`
    ///
    /// Directories for cases 2 and 3 are created when missing.
    pub fn resolve_storage_file_with<F>(&self, lookup: F) -> Result<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.name.is_empty() {
            return Err(StoreError::Config("store name must not be empty".to_string()));
        }

        if let Some(var) = &self.env_var {
            if let Some(dir) = lookup(var).filter(|d| !d.is_empty()) {
                let dir = dir.strip_suffix('/').unwrap_or(&dir);
                return Ok(PathBuf::from(dir).join(format!("ss_{}", self.name)));
            }
        }

        if let Some(dir) = &self.storage_dir {
            ensure_dir(dir)?;
            return Ok(dir.join(STORAGE_FILENAME));
        }

        let home = lookup("HOME")
            .filter(|h| !h.is_empty())
            .ok_or_else(|| StoreError::Construction("HOME environment variable not set".to_string()))?;
        let dir = PathBuf::from(home).join(format!(".{}", self.name));
        ensure_dir(&dir)?;
        Ok(dir.join(STORAGE_FILENAME))
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| {
        StoreError::Construction(format!("cannot create directory {}: {}", dir.display(), e))
    })
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the logical store name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set an explicit storage directory
    pub fn storage_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_dir = Some(path.into());
        self
    }

    /// Use a different environment variable for the directory override
    pub fn env_var(mut self, var: impl Into<String>) -> Self {
        self.config.env_var = Some(var.into());
        self
    }

    /// Ignore the environment entirely when resolving the directory
    pub fn ignore_env(mut self) -> Self {
        self.config.env_var = None;
        self
    }

    /// Set the broadcast policy
    pub fn broadcast_policy(mut self, policy: BroadcastPolicy) -> Self {
        self.config.broadcast_policy = policy;
        self
    }

    /// Enable or disable the change watcher
    pub fn watch(mut self, enabled: bool) -> Self {
        self.config.watch = enabled;
        self
    }

    /// Set the watcher debounce window (in milliseconds)
    pub fn watch_debounce_ms(mut self, ms: u64) -> Self {
        self.config.watch_debounce = Duration::from_millis(ms);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
