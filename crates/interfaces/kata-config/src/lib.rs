//! Runtime configuration: API endpoints, API key and workspace root.
//!
//! A [`Config`] is resolved once at startup and handed to every component
//! that needs it. Nothing reads configuration lazily.

use camino::{Utf8Path, Utf8PathBuf};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;

/// Default submission/status API.
pub const DEFAULT_API: &str = "https://api.exercism.io";

/// Default exercise catalog API.
pub const DEFAULT_XAPI: &str = "https://x.exercism.io";

/// Workspace directory name created under the home directory by default.
pub const DEFAULT_DIR_NAME: &str = "exercism";

pub const ENV_API_KEY: &str = "KATA_API_KEY";
pub const ENV_API: &str = "KATA_API";
pub const ENV_XAPI: &str = "KATA_XAPI";
pub const ENV_DIR: &str = "KATA_DIR";

const QUALIFIER: &str = "com";
const ORG: &str = "kata";
const APP: &str = "kata";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("could not determine config or home directory")]
    NoConfigDir,
    #[error("no API key configured (set apiKey in the config file or KATA_API_KEY)")]
    MissingApiKey,
}

/// On-disk shape of `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub api: Option<String>,
    pub xapi: Option<String>,
    pub dir: Option<String>,
}

impl ConfigFile {
    pub fn read(path: &Utf8Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Overlay values from `lookup` (normally the process environment).
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = non_empty(ENV_API) {
            self.api = Some(v);
        }
        if let Some(v) = non_empty(ENV_XAPI) {
            self.xapi = Some(v);
        }
        if let Some(v) = non_empty(ENV_DIR) {
            self.dir = Some(v);
        }
        self
    }

    /// Fill in defaults. `home` expands a leading `~` and anchors the default workspace.
    pub fn resolve(self, home: &Utf8Path) -> Config {
        let dir = match self.dir.as_deref() {
            Some("~") => home.to_path_buf(),
            Some(d) => match d.strip_prefix("~/") {
                Some(rest) => home.join(rest),
                None => Utf8PathBuf::from(d),
            },
            None => home.join(DEFAULT_DIR_NAME),
        };
        Config {
            api: self.api.unwrap_or_else(|| DEFAULT_API.to_string()),
            xapi: self.xapi.unwrap_or_else(|| DEFAULT_XAPI.to_string()),
            api_key: self.api_key.unwrap_or_default(),
            dir,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the submission/status API.
    pub api: String,
    /// Base URL of the exercise catalog.
    pub xapi: String,
    pub api_key: String,
    /// Workspace root: `<dir>/<language>/<exercise>/<file>`.
    pub dir: Utf8PathBuf,
}

impl Config {
    pub fn new(
        api: impl Into<String>,
        xapi: impl Into<String>,
        api_key: impl Into<String>,
        dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            api: api.into(),
            xapi: xapi.into(),
            api_key: api_key.into(),
            dir: dir.into(),
        }
    }

    /// Default location of `config.json`.
    pub fn default_path() -> Result<Utf8PathBuf, ConfigError> {
        let proj_dirs = ProjectDirs::from(QUALIFIER, ORG, APP).ok_or(ConfigError::NoConfigDir)?;
        Utf8PathBuf::from_path_buf(proj_dirs.config_dir().join("config.json"))
            .map_err(|_| ConfigError::NoConfigDir)
    }

    fn home_dir() -> Result<Utf8PathBuf, ConfigError> {
        let base = BaseDirs::new().ok_or(ConfigError::NoConfigDir)?;
        Utf8PathBuf::from_path_buf(base.home_dir().to_path_buf()).map_err(|_| ConfigError::NoConfigDir)
    }

    /// Resolve configuration from `explicit` (must exist) or the default
    /// path (may be absent), then the environment.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) => ConfigFile::read(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    ConfigFile::read(&path)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        let home = Self::home_dir()?;
        Ok(file.merge_env(|k| std::env::var(k).ok()).resolve(&home))
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(&self.api_key)
    }
}
