use std::path::PathBuf;
use std::time::Duration;

use marquee_core::{CachePolicy, ImageUrlBuilder, TmdbClientConfig, TmdbProxyConfig};
use url::Url;

use crate::routes::paths;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub tmdb: TmdbConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Origin other components of this process use to reach the server.
    /// Wildcard binds are reached through loopback.
    pub fn local_origin(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "" => "127.0.0.1".to_string(),
            "::" | "[::]" => "[::1]".to_string(),
            other if other.contains(':') && !other.starts_with('[') => {
                format!("[{other}]")
            }
            other => other.to_string(),
        };
        format!("http://{host}:{}", self.port)
    }
}

#[derive(Clone)]
pub struct TmdbConfig {
    pub access_token: Option<String>,
    pub api_base_url: Url,
    pub image_base_url: Url,
    pub language: String,
    /// Explicit metadata proxy URL; derived from the server address when unset.
    pub proxy_base_url: Option<Url>,
    /// Origin image downloads are sent to instead of the TMDB CDN. The
    /// `url` parameter is still validated against the CDN host.
    pub image_origin: Option<Url>,
    pub upstream_timeout: Duration,
    pub proxy_timeout: Duration,
    pub image_proxy_enabled: bool,
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("api_base_url", &self.api_base_url.as_str())
            .field("image_base_url", &self.image_base_url.as_str())
            .field("language", &self.language)
            .field("proxy_base_url", &self.proxy_base_url.as_ref().map(Url::as_str))
            .field("image_origin", &self.image_origin.as_ref().map(Url::as_str))
            .field("upstream_timeout", &self.upstream_timeout)
            .field("proxy_timeout", &self.proxy_timeout)
            .field("image_proxy_enabled", &self.image_proxy_enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub retry_after_failure: Duration,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

impl Config {
    /// Where the upstream client sends metadata requests.
    pub fn proxy_base_url(&self) -> Result<Url, url::ParseError> {
        match &self.tmdb.proxy_base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(&format!(
                "{}{}",
                self.server.local_origin(),
                paths::TMDB_PROXY
            )),
        }
    }

    pub fn client_config(&self) -> Result<TmdbClientConfig, url::ParseError> {
        Ok(TmdbClientConfig::new(self.proxy_base_url()?)
            .with_timeout(self.tmdb.upstream_timeout)
            .with_language(self.tmdb.language.clone()))
    }

    pub fn proxy_config(&self) -> TmdbProxyConfig {
        TmdbProxyConfig::new(
            self.tmdb.api_base_url.clone(),
            self.tmdb.access_token.clone(),
        )
        .with_timeout(self.tmdb.proxy_timeout)
        .with_image_origin(self.tmdb.image_origin.clone())
    }

    pub fn image_urls(&self) -> ImageUrlBuilder {
        ImageUrlBuilder::new(
            self.tmdb.image_base_url.as_str(),
            self.tmdb.image_proxy_enabled,
        )
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: self.cache.ttl,
            retry_after_failure: self.cache.retry_after_failure,
        }
    }
}
