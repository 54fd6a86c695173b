//! Profile API configuration loaded from the environment.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::ClientError;

pub const API_URL_KEY: &str = "PROFILE_API_URL";
pub const TIMEOUT_KEY: &str = "PROFILE_API_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Where and how to reach the profile API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Load from `PROFILE_API_URL` and `PROFILE_API_TIMEOUT_SECS`.
    ///
    /// Unset variables fall back to their defaults; set but unparsable ones
    /// are an error.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let api_url: String = try_load(&lookup, API_URL_KEY, DEFAULT_API_URL)?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ClientError::Config {
                key: API_URL_KEY,
                reason: format!("expected an http(s) URL, got {api_url:?}"),
            });
        }

        let timeout_secs: u64 = try_load(&lookup, TIMEOUT_KEY, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ClientError::Config {
                key: TIMEOUT_KEY,
                reason: "timeout must be at least one second".to_string(),
            });
        }

        Ok(Self::new(api_url, Duration::from_secs(timeout_secs)))
    }

    /// Endpoint that accepts the multipart photo upload.
    pub fn upload_url(&self) -> String {
        format!("{}/users/profile-photo", self.api_url)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ClientError>
where
    T::Err: Display,
{
    let raw = lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        });

    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ClientError::Config {
            key,
            reason: e.to_string(),
        }
    })
}
