// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::defaults::*;
use crate::consts::{DEFAULT_CONFIG_FILE, ENV_CONFIG, ENV_DB, ENV_PORT, ENV_ROOT};
use crate::core::store::AreaLayout;
use crate::enums::NamingPolicy;
use crate::error::CoreError;
use crate::CoreResult as Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub server: Server,
    pub storage: Storage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub artifact_root: PathBuf,
    pub registry_db: PathBuf,
    pub source_dir: String,
    pub encrypted_dir: String,
    pub decrypted_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub port: u16,
    pub max_upload_bytes: usize,
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub naming: NamingPolicy,
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for Server {
    fn default() -> Self {
        default_server()
    }
}

impl Default for Storage {
    fn default() -> Self {
        default_storage()
    }
}

impl Paths {
    pub fn layout(&self) -> AreaLayout {
        AreaLayout {
            source: self.source_dir.clone(),
            encrypted: self.encrypted_dir.clone(),
            decrypted: self.decrypted_dir.clone(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Apply `IMAGE_VAULT_ROOT`, `IMAGE_VAULT_DB` and `IMAGE_VAULT_PORT`
    /// through `lookup`, so callers (and tests) choose the variable source
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_ROOT) {
            self.paths.artifact_root = root.into();
        }
        if let Some(db) = lookup(ENV_DB) {
            self.paths.registry_db = db.into();
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| CoreError::Config(format!("{ENV_PORT}={port:?} is not a port")))?;
        }
        Ok(())
    }
}

/// Load config at startup (falls back to defaults if the file is missing)
pub fn load() -> Result<Config> {
    let config_path =
        std::env::var(ENV_CONFIG).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let mut conf = if Path::new(&config_path).exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::info!(path = %config_path, "config file not found, using built-in defaults");
        Config::default()
    };

    conf.apply_overrides(|name| std::env::var(name).ok())?;
    Ok(conf)
}
