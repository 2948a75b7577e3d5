//! On-disk store discovery and initialization
//!
//! A store is a directory (default `.trackport/`) holding `config.toml` and the
//! SQLite key/value database.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::engine::{Engine, EngineOptions};
use crate::error::{Result, TrackportError};
use crate::kv::SqliteStore;

/// Default store directory name
pub const DEFAULT_STORE_DIR: &str = ".trackport";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// Walk up from `root` until a directory containing a store is found
pub fn discover_store(root: &Path) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    loop {
        let store_path = current.join(DEFAULT_STORE_DIR);
        if store_path.is_dir() {
            return Ok(store_path);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(TrackportError::StoreNotFound {
                    search_root: root.to_path_buf(),
                });
            }
        }
    }
}

/// An opened trackport store
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    config: StoreConfig,
}

impl Store {
    /// Discover a store by walking up from the given directory
    pub fn discover(root: &Path) -> Result<Self> {
        let store_path = discover_store(root)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(TrackportError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            StoreConfig::default()
        };

        Ok(Store {
            root: path.to_path_buf(),
            config,
        })
    }

    /// Initialize a new store under the given project root
    pub fn init(project_root: &Path) -> Result<Self> {
        Self::init_at(&project_root.join(DEFAULT_STORE_DIR))
    }

    /// Initialize a store at an explicit path. Existing stores are reopened
    /// untouched.
    pub fn init_at(store_root: &Path) -> Result<Self> {
        fs::create_dir_all(store_root)?;

        let config_path = store_root.join(CONFIG_FILE);
        if !config_path.exists() {
            StoreConfig::default().save(&config_path)?;
        }

        // create the database and schema eagerly
        SqliteStore::open(store_root)?;
        tracing::info!(path = %store_root.display(), "store initialized");

        Self::open(store_root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Open the key/value database and wrap it in an engine
    pub fn engine(&self) -> Result<Engine<SqliteStore>> {
        self.engine_with(EngineOptions::from(&self.config))
    }

    /// Like [`Store::engine`], with options overridden by the caller
    pub fn engine_with(&self, options: EngineOptions) -> Result<Engine<SqliteStore>> {
        let kv = SqliteStore::open(&self.root)?;
        Ok(Engine::with_options(kv, options))
    }
}
