//! Client configuration and credentials
//!
//! Both are stored as RON files. Credentials may also come from the
//! environment, which takes precedence over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use rcad_core::{CadError, CadResult, UnitSystem};

pub const DEFAULT_BASE_URL: &str = "https://cad.onshape.com/api/v6";

pub const ACCESS_KEY_VAR: &str = "ONSHAPE_DEV_ACCESS";
pub const SECRET_KEY_VAR: &str = "ONSHAPE_DEV_SECRET";

const ACCESS_KEY_LEN: usize = 24;
const SECRET_KEY_LEN: usize = 48;

/// Errors reading or writing configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

fn write_ron<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let content = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|e| ConfigError::Serialize(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
}

fn read_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
}

// ============== ClientConfig ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub units: UnitSystem,
    /// Global request timeout
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            units: UnitSystem::default(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_ron(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_ron(self, path.as_ref())
    }
}

// ============== Credentials ==============

/// API key pair used for basic auth
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validated key pair
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> CadResult<Self> {
        let credentials = Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Check key lengths without contacting the service
    pub fn validate(&self) -> CadResult<()> {
        if self.access_key.len() != ACCESS_KEY_LEN {
            return Err(CadError::Auth(format!(
                "Access key must be {} characters, got {}",
                ACCESS_KEY_LEN,
                self.access_key.len()
            )));
        }
        if self.secret_key.len() != SECRET_KEY_LEN {
            return Err(CadError::Auth(format!(
                "Secret key must be {} characters, got {}",
                SECRET_KEY_LEN,
                self.secret_key.len()
            )));
        }
        Ok(())
    }

    /// `$HOME/.rcad/credentials.ron`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".rcad").join("credentials.ron"))
    }

    /// Key pair from environment values, when both are present
    fn from_vars(access: Option<String>, secret: Option<String>) -> Option<CadResult<Self>> {
        match (access, secret) {
            (Some(access), Some(secret)) => Some(Self::new(access, secret)),
            _ => None,
        }
    }

    pub fn from_env() -> Option<CadResult<Self>> {
        Self::from_vars(
            std::env::var(ACCESS_KEY_VAR).ok(),
            std::env::var(SECRET_KEY_VAR).ok(),
        )
    }

    pub fn load(path: impl AsRef<Path>) -> CadResult<Self> {
        let path = path.as_ref();
        let credentials: Credentials = read_ron(path).map_err(|e| {
            CadError::Auth(format!("Failed to read credentials from {}: {}", path.display(), e))
        })?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Environment first, then the default credentials file
    pub fn resolve() -> CadResult<Self> {
        if let Some(credentials) = Self::from_env() {
            debug!("Using credentials from environment");
            return credentials;
        }
        let path = Self::default_path().ok_or_else(|| {
            CadError::Auth(format!(
                "No credentials: set {} and {}, or create a credentials file",
                ACCESS_KEY_VAR, SECRET_KEY_VAR
            ))
        })?;
        debug!("Using credentials from {}", path.display());
        Self::load(path)
    }

    /// Validate, then write the key pair to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> CadResult<()> {
        self.validate()?;
        write_ron(self, path.as_ref())
            .map_err(|e| CadError::Auth(format!("Failed to save credentials: {}", e)))
    }
}
