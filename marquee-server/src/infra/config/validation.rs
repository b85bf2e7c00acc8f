use axum::http::HeaderValue;
use thiserror::Error;

use std::time::Duration;

use super::models::Config;

/// Upper bound for `CACHE_TTL_SECS`.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error(
        "CACHE_RETRY_AFTER_FAILURE_SECS ({retry_secs}s) must be shorter than CACHE_TTL_SECS ({ttl_secs}s)"
    )]
    RetryWindowTooLong { retry_secs: u64, ttl_secs: u64 },
    #[error("CACHE_TTL_SECS ({ttl_secs}s) must not exceed {max_secs}s")]
    TtlTooLong { ttl_secs: u64, max_secs: u64 },
    #[error("{field} must use http or https, got `{scheme}`")]
    UnsupportedScheme { field: &'static str, scheme: String },
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS origin `{origin}`")]
    InvalidCorsOrigin { origin: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.message.contains(needle))
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    for (field, value) in [
        ("UPSTREAM_TIMEOUT_MS", config.tmdb.upstream_timeout),
        ("PROXY_TIMEOUT_MS", config.tmdb.proxy_timeout),
        ("CACHE_TTL_SECS", config.cache.ttl),
    ] {
        if value.is_zero() {
            return Err(ConfigGuardRailError::ZeroDuration { field });
        }
    }

    if config.cache.ttl > MAX_CACHE_TTL {
        return Err(ConfigGuardRailError::TtlTooLong {
            ttl_secs: config.cache.ttl.as_secs(),
            max_secs: MAX_CACHE_TTL.as_secs(),
        });
    }

    if config.cache.retry_after_failure >= config.cache.ttl {
        return Err(ConfigGuardRailError::RetryWindowTooLong {
            retry_secs: config.cache.retry_after_failure.as_secs(),
            ttl_secs: config.cache.ttl.as_secs(),
        });
    }

    let mut urls = vec![
        ("TMDB_API_BASE_URL", &config.tmdb.api_base_url),
        ("TMDB_IMAGE_BASE_URL", &config.tmdb.image_base_url),
    ];
    if let Some(proxy) = &config.tmdb.proxy_base_url {
        urls.push(("TMDB_PROXY_BASE_URL", proxy));
    }
    if let Some(origin) = &config.tmdb.image_origin {
        urls.push(("TMDB_IMAGE_ORIGIN", origin));
    }
    for (field, url) in urls {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigGuardRailError::UnsupportedScheme {
                field,
                scheme: url.scheme().to_string(),
            });
        }
    }

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }
    for origin in &config.cors.allowed_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            return Err(ConfigGuardRailError::InvalidCorsOrigin {
                origin: origin.clone(),
            });
        }
    }

    if config.tmdb.access_token.is_none() {
        warnings.push_with_hint(
            "TMDB_ACCESS_TOKEN not set; the metadata proxy forwards without credentials and listings will fall back to built-in movies",
            "Set TMDB_ACCESS_TOKEN or TMDB_ACCESS_TOKEN_FILE to a TMDB v4 read access token",
        );
    }

    if config.cache.retry_after_failure.as_secs() < 5 {
        warnings.push(
            "CACHE_RETRY_AFTER_FAILURE_SECS below 5s; an unreachable upstream will be hit on almost every request",
        );
    }

    Ok(warnings)
}
