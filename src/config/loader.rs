//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.roster.toml` in the working directory
//! 4. `~/.config/roster/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::IdStrategy;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub sync: SyncConfig,
}

/// Collection endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// URL of the user collection (GET/POST here, PUT/DELETE on `{url}/{id}`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_API_URL.to_string(),
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub page_size: usize,
    /// How long success notices stay up before clearing themselves.
    pub notice_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: constants::DEFAULT_PAGE_SIZE,
            notice_secs: constants::DEFAULT_NOTICE_SECS,
        }
    }
}

/// Local reconciliation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub id_strategy: IdStrategy,
}

/// One config file as written: only the keys it actually sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    api: ApiLayer,
    ui: UiLayer,
    sync: SyncLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ApiLayer {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiLayer {
    page_size: Option<usize>,
    notice_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SyncLayer {
    id_strategy: Option<IdStrategy>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the working-directory config, then applies
    /// environment variable overrides. CLI flags are applied separately by
    /// [`Config::apply_cli_overrides`].
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                tracing::debug!(path = %global_path.display(), "loading global config");
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                tracing::debug!(path = %local_path.display(), "loading local config");
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Apply CLI flag overrides (layer 1) and validate the result.
    pub fn apply_cli_overrides(
        &mut self,
        api_url: Option<String>,
        page_size: Option<usize>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = api_url {
            self.api.base_url = url;
        }
        if let Some(size) = page_size {
            self.ui.page_size = size;
        }
        self.validate()
    }

    /// Reject values the rest of the program cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ui.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".to_string()));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Load the keys set in a specific file.
    fn load_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Overlay every key the layer sets, whatever its value.
    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(url) = layer.api.base_url {
            self.api.base_url = url;
        }
        if let Some(secs) = layer.api.timeout_secs {
            self.api.timeout_secs = secs;
        }
        if let Some(size) = layer.ui.page_size {
            self.ui.page_size = size;
        }
        if let Some(secs) = layer.ui.notice_secs {
            self.ui.notice_secs = secs;
        }
        if let Some(strategy) = layer.sync.id_strategy {
            self.sync.id_strategy = strategy;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_API_URL) {
            if !val.trim().is_empty() {
                self.api.base_url = val;
            }
        }

        match env.parsed::<usize>(constants::ENV_PAGE_SIZE) {
            Some(Ok(size)) if size > 0 => self.ui.page_size = size,
            Some(Ok(_)) | Some(Err(_)) => warn_invalid(env, constants::ENV_PAGE_SIZE),
            None => {}
        }

        match env.parsed::<u64>(constants::ENV_TIMEOUT_SECS) {
            Some(Ok(secs)) if secs > 0 => self.api.timeout_secs = secs,
            Some(Ok(_)) | Some(Err(_)) => warn_invalid(env, constants::ENV_TIMEOUT_SECS),
            None => {}
        }

        match env.parsed::<IdStrategy>(constants::ENV_ID_STRATEGY) {
            Some(Ok(strategy)) => self.sync.id_strategy = strategy,
            Some(Err(_)) => warn_invalid(env, constants::ENV_ID_STRATEGY),
            None => {}
        }
    }
}

fn warn_invalid(env: &Env, name: &str) {
    let val = env.var(name).unwrap_or_default();
    tracing::warn!(var = name, value = %val, "ignoring invalid environment value");
}
