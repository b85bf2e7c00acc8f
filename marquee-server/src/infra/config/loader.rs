use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use url::Url;

use marquee_core::image::DEFAULT_IMAGE_BASE_URL;
use marquee_core::{CachePolicy, TmdbClientConfig, TmdbProxyConfig};

use super::{
    models::{
        CacheConfig, Config, ConfigMetadata, CorsConfig, DEFAULT_API_BASE_URL,
        DEFAULT_HOST, DEFAULT_LANGUAGE, DEFAULT_PORT, ServerConfig, TmdbConfig,
    },
    sources::{EnvConfig, FileConfig, FileTmdbConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("marquee.toml"),
        PathBuf::from("config/marquee.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Loads `.env`, the TOML file and the process environment, in that order.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Same as [`load`](Self::load) with an explicit environment view and no
    /// `.env` handling.
    pub fn load_with_env(
        &self,
        env_config: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env_config)?;
        let (config, warnings) =
            self.compose_config(file_config, env_config, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = if let Some(explicit) = &self.options.config_path {
            (Some(explicit.clone()), true)
        } else if let Some(from_env) = &env_config.config_path {
            (Some(from_env.clone()), true)
        } else {
            let found = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned();
            (found, false)
        };

        let Some(path) = path else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No marquee.toml detected; using environment variables and defaults",
                "Create marquee.toml or set MARQUEE_CONFIG_PATH to customise the server",
            );
        }

        let FileConfig {
            server: file_server,
            tmdb: file_tmdb,
            cache: file_cache,
            cors: file_cors,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let access_token = Self::resolve_access_token(&env, &file_tmdb)?;

        let tmdb = TmdbConfig {
            access_token,
            api_base_url: parse_url(
                "TMDB_API_BASE_URL",
                env.tmdb_api_base_url
                    .as_deref()
                    .or(file_tmdb.api_base_url.as_deref())
                    .unwrap_or(DEFAULT_API_BASE_URL),
            )?,
            image_base_url: parse_url(
                "TMDB_IMAGE_BASE_URL",
                env.tmdb_image_base_url
                    .as_deref()
                    .or(file_tmdb.image_base_url.as_deref())
                    .unwrap_or(DEFAULT_IMAGE_BASE_URL),
            )?,
            language: env
                .tmdb_language
                .clone()
                .or(file_tmdb.language.clone())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            proxy_base_url: env
                .tmdb_proxy_base_url
                .as_deref()
                .or(file_tmdb.proxy_base_url.as_deref())
                .map(|raw| parse_url("TMDB_PROXY_BASE_URL", raw))
                .transpose()?,
            image_origin: env
                .tmdb_image_origin
                .as_deref()
                .or(file_tmdb.image_origin.as_deref())
                .map(|raw| parse_url("TMDB_IMAGE_ORIGIN", raw))
                .transpose()?,
            upstream_timeout: env
                .upstream_timeout_ms
                .or(file_tmdb.timeout_ms)
                .map(Duration::from_millis)
                .unwrap_or(TmdbClientConfig::DEFAULT_TIMEOUT),
            proxy_timeout: env
                .proxy_timeout_ms
                .or(file_tmdb.proxy_timeout_ms)
                .map(Duration::from_millis)
                .unwrap_or(TmdbProxyConfig::DEFAULT_TIMEOUT),
            image_proxy_enabled: env
                .image_proxy_enabled
                .or(file_tmdb.image_proxy)
                .unwrap_or(true),
        };

        let cache = CacheConfig {
            ttl: env
                .cache_ttl_secs
                .or(file_cache.ttl_secs)
                .map(Duration::from_secs)
                .unwrap_or(CachePolicy::DEFAULT_TTL),
            retry_after_failure: env
                .cache_retry_after_failure_secs
                .or(file_cache.retry_after_failure_secs)
                .map(Duration::from_secs)
                .unwrap_or(CachePolicy::DEFAULT_RETRY_AFTER_FAILURE),
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .clone()
                .or(file_cors.allowed_origins)
                .unwrap_or_else(default_cors_origins),
        };

        let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

        let config = Config {
            server,
            tmdb,
            cache,
            cors,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
            },
        };

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }

    fn resolve_access_token(
        env: &EnvConfig,
        file_tmdb: &FileTmdbConfig,
    ) -> Result<Option<String>, ConfigLoadError> {
        if let Some(token) = env.tmdb_access_token.clone() {
            return Ok(Some(token.trim().to_string()));
        }

        if let Some(path) = env.tmdb_access_token_file.as_ref()
            && let Some(token) = Self::read_secret_file(path)?
        {
            return Ok(Some(token));
        }

        if let Some(token) = file_tmdb
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            return Ok(Some(token.to_string()));
        }

        if let Some(path) = file_tmdb.access_token_file.as_ref() {
            return Self::read_secret_file(path);
        }

        Ok(None)
    }

    fn read_secret_file(
        path: &Path,
    ) -> Result<Option<String>, ConfigLoadError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            ConfigLoadError::SecretFileIo {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigLoadError> {
    Url::parse(raw.trim()).map_err(|source| ConfigLoadError::InvalidUrl {
        field,
        value: raw.to_string(),
        source,
    })
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid URL `{value}` for {field}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to read secret file {path}")]
    SecretFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
