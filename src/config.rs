//! Build-time client configuration.
//!
//! DESIGN
//! ======
//! A WASM bundle has no process environment at runtime, so settings are baked
//! in from environment variables at compile time. Missing or malformed values
//! fall back to defaults rather than failing the build.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";
pub const DEFAULT_LOADING_NOTICE_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Web API key for the identity service.
    pub auth_api_key: String,
    /// Identity toolkit base URL, without trailing slash.
    pub auth_base_url: String,
    /// Secure-token refresh endpoint.
    pub token_url: String,
    /// How long the access gate waits before showing the slow-load notice.
    pub loading_notice_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_api_key: String::new(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_owned(),
            token_url: DEFAULT_TOKEN_URL.to_owned(),
            loading_notice_delay: Duration::from_secs(DEFAULT_LOADING_NOTICE_SECS),
        }
    }
}

impl AppConfig {
    /// Resolve from `VITALYTICS_*` variables captured at compile time.
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("VITALYTICS_AUTH_API_KEY"),
            option_env!("VITALYTICS_AUTH_BASE_URL"),
            option_env!("VITALYTICS_TOKEN_URL"),
            option_env!("VITALYTICS_LOADING_NOTICE_SECS"),
        )
    }

    pub fn from_values(
        api_key: Option<&str>,
        base_url: Option<&str>,
        token_url: Option<&str>,
        notice_secs: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            auth_api_key: api_key.map(str::trim).unwrap_or_default().to_owned(),
            auth_base_url: non_empty_url(base_url).unwrap_or(defaults.auth_base_url),
            token_url: non_empty_url(token_url).unwrap_or(defaults.token_url),
            loading_notice_delay: parse_notice_secs(notice_secs).unwrap_or(defaults.loading_notice_delay),
        }
    }

    /// True when an API key was provided.
    pub fn has_api_key(&self) -> bool {
        !self.auth_api_key.is_empty()
    }
}

fn non_empty_url(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn parse_notice_secs(raw: Option<&str>) -> Option<Duration> {
    let secs: u64 = raw?.trim().parse().ok()?;
    (secs > 0).then(|| Duration::from_secs(secs))
}
