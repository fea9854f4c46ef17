//! Runtime configuration: API key, base URL, hourly budget, and timeout.
//!
//! Values come from the environment first. The API key may alternatively
//! live in a TOML secrets file:
//!
//! ```toml
//! [cdg_api]
//! api_auth_key = "..."
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use congress_api::rate_limiter::DEFAULT_LIMIT_PER_HOUR;
use congress_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use serde::Deserialize;

use crate::error::GatewayError;

pub const API_KEY_VAR: &str = "CONGRESSIONAL_API_KEY";
pub const BASE_URL_VAR: &str = "CONGRESS_API_BASE_URL";
pub const RATE_LIMIT_VAR: &str = "CONGRESS_RATE_LIMIT_PER_HOUR";
pub const TIMEOUT_VAR: &str = "CONGRESS_REQUEST_TIMEOUT_SECS";
pub const SECRETS_FILE_VAR: &str = "CONGRESS_SECRETS_FILE";

/// Default secrets file, relative to the working directory.
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Value shipped in the example secrets file; treated as missing.
const PLACEHOLDER_KEY: &str = "PASTE_KEY_HERE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub rate_limit_per_hour: u64,
    pub request_timeout: Duration,
}

#[derive(Deserialize)]
struct SecretsFile {
    cdg_api: Option<CdgApi>,
}

#[derive(Deserialize)]
struct CdgApi {
    api_auth_key: Option<String>,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, GatewayError> {
        let secrets = std::env::var(SECRETS_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE));
        Self::resolve(|key| std::env::var(key).ok(), Some(&secrets))
    }

    /// Resolve configuration from an arbitrary variable lookup and an optional
    /// secrets file. A secrets file that does not exist is skipped.
    pub fn resolve<F>(lookup: F, secrets_path: Option<&Path>) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .and_then(|k| usable_key(&k))
            .map(Ok)
            .or_else(|| secrets_path.and_then(|p| read_secrets_key(p).transpose()))
            .transpose()?
            .ok_or_else(|| {
                GatewayError::Config(format!(
                    "Congress API key not found. Set {} or configure api_auth_key under [cdg_api] in {}",
                    API_KEY_VAR,
                    secrets_path
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| DEFAULT_SECRETS_FILE.to_string())
                ))
            })?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            rate_limit_per_hour: env_u64(&lookup, RATE_LIMIT_VAR, DEFAULT_LIMIT_PER_HOUR),
            request_timeout: Duration::from_secs(env_u64(
                &lookup,
                TIMEOUT_VAR,
                DEFAULT_TIMEOUT.as_secs(),
            )),
        })
    }
}

/// The trimmed key, or `None` when it is blank or still the placeholder.
fn usable_key(key: &str) -> Option<String> {
    let key = key.trim();
    (!key.is_empty() && key != PLACEHOLDER_KEY).then(|| key.to_string())
}

fn read_secrets_key(path: &Path) -> Result<Option<String>, GatewayError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|e| {
        GatewayError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    let secrets: SecretsFile = toml::from_str(&text).map_err(|e| {
        GatewayError::Config(format!("failed to parse {}: {}", path.display(), e))
    })?;
    Ok(secrets
        .cdg_api
        .and_then(|section| section.api_auth_key)
        .and_then(|k| usable_key(&k)))
}

fn env_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
