//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CINEMATCH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_TOP_N, DEFAULT_MODEL_ID, DEFAULT_MODEL_LOAD_TIMEOUT_SECS, DEFAULT_TOP_N,
};
use crate::embedding::MiniLmConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CINEMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// JSON catalog file. Default: `./data/catalog.json`.
    pub catalog_path: PathBuf,

    /// Local model directory (`config.json`, `tokenizer.json`, `model.safetensors`).
    /// When unset the model is fetched from the hub by [`model_id`](Self::model_id).
    pub model_dir: Option<PathBuf>,

    /// Hub model id. Default: `sentence-transformers/all-MiniLM-L6-v2`.
    pub model_id: String,

    /// Use hash-seeded stub vectors instead of a model. Default: `false`.
    pub embedder_stub: bool,

    /// Upper bound on model loading. Default: 120 s.
    pub model_load_timeout: Duration,

    /// Result count when a request omits `top_n`. Default: `3`.
    pub default_top_n: usize,

    /// Largest `top_n` a request may ask for. Default: `50`.
    pub max_top_n: usize,
}

/// Default catalog location used when `CINEMATCH_CATALOG_PATH` is not set.
pub const DEFAULT_CATALOG_PATH: &str = "./data/catalog.json";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            model_dir: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            embedder_stub: false,
            model_load_timeout: Duration::from_secs(DEFAULT_MODEL_LOAD_TIMEOUT_SECS),
            default_top_n: DEFAULT_TOP_N,
            max_top_n: DEFAULT_MAX_TOP_N,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "CINEMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "CINEMATCH_BIND_ADDR";
    const ENV_CATALOG_PATH: &'static str = "CINEMATCH_CATALOG_PATH";
    const ENV_MODEL_DIR: &'static str = "CINEMATCH_MODEL_DIR";
    const ENV_MODEL_ID: &'static str = "CINEMATCH_MODEL_ID";
    const ENV_EMBEDDER_STUB: &'static str = "CINEMATCH_EMBEDDER_STUB";
    const ENV_MODEL_LOAD_TIMEOUT_SECS: &'static str = "CINEMATCH_MODEL_LOAD_TIMEOUT_SECS";
    const ENV_DEFAULT_TOP_N: &'static str = "CINEMATCH_DEFAULT_TOP_N";
    const ENV_MAX_TOP_N: &'static str = "CINEMATCH_MAX_TOP_N";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let model_id = Self::parse_string_from_env(Self::ENV_MODEL_ID, defaults.model_id);
        let embedder_stub = Self::parse_bool_from_env(Self::ENV_EMBEDDER_STUB, defaults.embedder_stub);
        let model_load_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_MODEL_LOAD_TIMEOUT_SECS,
            defaults.model_load_timeout.as_secs(),
        ));
        let default_top_n = Self::parse_usize_from_env(Self::ENV_DEFAULT_TOP_N, defaults.default_top_n);
        let max_top_n = Self::parse_usize_from_env(Self::ENV_MAX_TOP_N, defaults.max_top_n);

        Ok(Self {
            port,
            bind_addr,
            catalog_path,
            model_dir,
            model_id,
            embedder_stub,
            model_load_timeout,
            default_top_n,
            max_top_n,
        })
    }

    /// Validates paths and basic invariants.
    ///
    /// A missing catalog file is allowed: the service starts and reports the catalog
    /// as unavailable until the file appears.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_path.exists() && !self.catalog_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.catalog_path.clone(),
            });
        }

        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.max_top_n == 0 || self.default_top_n == 0 || self.default_top_n > self.max_top_n {
            return Err(ConfigError::InvalidTopN {
                default_top_n: self.default_top_n,
                max_top_n: self.max_top_n,
            });
        }

        if self.model_load_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                name: Self::ENV_MODEL_LOAD_TIMEOUT_SECS,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Embedder settings derived from this configuration.
    ///
    /// Stub mode wins over a model directory; a model directory wins over the hub id.
    pub fn minilm_config(&self) -> MiniLmConfig {
        let config = if self.embedder_stub {
            MiniLmConfig::stub()
        } else if let Some(ref dir) = self.model_dir {
            MiniLmConfig::from_dir(dir.clone())
        } else {
            MiniLmConfig::from_hub(self.model_id.clone())
        };
        config.with_load_timeout(self.model_load_timeout)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        match env::var(var_name) {
            Ok(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            Err(_) => default,
        }
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
