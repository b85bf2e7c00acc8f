use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub tmdb: FileTmdbConfig,
    #[serde(default)]
    pub cache: FileCacheConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_proxy: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_failure_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub tmdb_access_token: Option<String>,
    pub tmdb_access_token_file: Option<PathBuf>,
    pub tmdb_api_base_url: Option<String>,
    pub tmdb_image_base_url: Option<String>,
    pub tmdb_language: Option<String>,
    pub tmdb_proxy_base_url: Option<String>,
    pub tmdb_image_origin: Option<String>,
    pub upstream_timeout_ms: Option<u64>,
    pub proxy_timeout_ms: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_retry_after_failure_secs: Option<u64>,
    pub image_proxy_enabled: Option<bool>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the environment view from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let number = |name: &str| text(name).and_then(|raw| raw.trim().parse().ok());

        Self {
            config_path: text("MARQUEE_CONFIG_PATH").map(PathBuf::from),
            server_host: text("SERVER_HOST"),
            server_port: text("SERVER_PORT").and_then(|raw| raw.trim().parse().ok()),
            tmdb_access_token: text("TMDB_ACCESS_TOKEN"),
            tmdb_access_token_file: text("TMDB_ACCESS_TOKEN_FILE").map(PathBuf::from),
            tmdb_api_base_url: text("TMDB_API_BASE_URL"),
            tmdb_image_base_url: text("TMDB_IMAGE_BASE_URL"),
            tmdb_language: text("TMDB_LANGUAGE"),
            tmdb_proxy_base_url: text("TMDB_PROXY_BASE_URL"),
            tmdb_image_origin: text("TMDB_IMAGE_ORIGIN"),
            upstream_timeout_ms: number("UPSTREAM_TIMEOUT_MS"),
            proxy_timeout_ms: number("PROXY_TIMEOUT_MS"),
            cache_ttl_secs: number("CACHE_TTL_SECS"),
            cache_retry_after_failure_secs: number("CACHE_RETRY_AFTER_FAILURE_SECS"),
            image_proxy_enabled: text("IMAGE_PROXY_ENABLED").and_then(|raw| parse_bool(&raw)),
            cors_allowed_origins: text("CORS_ALLOWED_ORIGINS").map(|raw| parse_csv(&raw)),
            dev_mode: text("DEV_MODE").and_then(|raw| parse_bool(&raw)),
        }
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
