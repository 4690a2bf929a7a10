//! Configuration loading for the shortlist server and harness.
//!
//! An optional `shortlist.toml` in the working directory provides file-based
//! configuration; `SHORTLIST_*` environment variables override individual
//! values. A missing file is not an error. The authentication secret is
//! mandatory for both binaries and is injected into their contexts at
//! startup; it is never a mutable global and never appears in `Debug` output.

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "shortlist.toml";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DEADLINE_SECS: u64 = 5;
pub const DEFAULT_URL: &str = "http://localhost:3000/runtest";
pub const DEFAULT_RUNS: u32 = 100;
pub const DEFAULT_BUDGET: f64 = 500.0;
pub const DEFAULT_FIXTURE: &str = "tests.json";
pub const DEFAULT_OUTPUT: &str = "results.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no authentication secret configured (set SHORTLIST_SECRET or [auth] secret)")]
    MissingSecret,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShortlistConfig {
    pub auth: Option<AuthConfig>,
    pub server: Option<ServerConfig>,
    pub harness: Option<HarnessConfig>,
}

#[derive(Default, Deserialize)]
pub struct AuthConfig {
    pub secret: Option<String>,
}

// Manual Debug impl to prevent leaking the secret in logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = if self.secret.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("AuthConfig").field("secret", &secret).finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    /// Hard wall-clock deadline for one selection, in seconds.
    pub deadline_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarnessConfig {
    pub url: Option<String>,
    pub runs: Option<u32>,
    pub budget: Option<f64>,
    pub fixture: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl ShortlistConfig {
    /// Load `shortlist.toml` from the working directory.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }
}

/// Resolved server configuration: file values with env overrides applied.
pub struct ServerSettings {
    pub secret: String,
    pub port: u16,
    pub deadline: Duration,
}

impl ServerSettings {
    pub fn resolve(config: Option<&ShortlistConfig>) -> Result<Self, ConfigError> {
        let secret = resolve_secret(config)?;
        let port = parse_env("SHORTLIST_PORT")
            .or_else(|| config.and_then(|c| c.server.as_ref()).and_then(|s| s.port))
            .unwrap_or(DEFAULT_PORT);
        let deadline_secs = parse_env("SHORTLIST_DEADLINE_SECS")
            .or_else(|| {
                config
                    .and_then(|c| c.server.as_ref())
                    .and_then(|s| s.deadline_secs)
            })
            .unwrap_or(DEFAULT_DEADLINE_SECS);
        Ok(Self {
            secret,
            port,
            deadline: Duration::from_secs(deadline_secs),
        })
    }
}

/// Resolved harness configuration: file values with env overrides applied.
pub struct HarnessSettings {
    pub secret: String,
    pub url: String,
    pub runs: u32,
    pub budget: f64,
    pub fixture: PathBuf,
    pub output: PathBuf,
}

impl HarnessSettings {
    pub fn resolve(config: Option<&ShortlistConfig>) -> Result<Self, ConfigError> {
        let secret = resolve_secret(config)?;
        let harness = config.and_then(|c| c.harness.as_ref());
        let url = env_override("SHORTLIST_URL")
            .or_else(|| harness.and_then(|h| h.url.clone()))
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let runs = parse_env("SHORTLIST_RUNS")
            .or_else(|| harness.and_then(|h| h.runs))
            .unwrap_or(DEFAULT_RUNS);
        let budget = parse_env("SHORTLIST_BUDGET")
            .or_else(|| harness.and_then(|h| h.budget))
            .unwrap_or(DEFAULT_BUDGET);
        let fixture = env_override("SHORTLIST_FIXTURE")
            .map(PathBuf::from)
            .or_else(|| harness.and_then(|h| h.fixture.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE));
        let output = env_override("SHORTLIST_OUTPUT")
            .map(PathBuf::from)
            .or_else(|| harness.and_then(|h| h.output.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        Ok(Self {
            secret,
            url,
            runs,
            budget,
            fixture,
            output,
        })
    }
}

fn resolve_secret(config: Option<&ShortlistConfig>) -> Result<String, ConfigError> {
    env_override("SHORTLIST_SECRET")
        .or_else(|| {
            config
                .and_then(|c| c.auth.as_ref())
                .and_then(|a| a.secret.clone())
        })
        .ok_or(ConfigError::MissingSecret)
}

fn env_override(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env_override(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Ignoring unparsable {name}={raw}: {err}");
            None
        }
    }
}
