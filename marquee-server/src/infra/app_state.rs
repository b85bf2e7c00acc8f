use std::{fmt, sync::Arc};

use anyhow::Context;
use chrono::{DateTime, Utc};
use marquee_core::{
    MovieAdapter, MovieRepository, MovieSource, TmdbClient, TmdbProxy,
};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repository: Arc<MovieRepository>,
    /// Raw upstream access, used by diagnostics that must bypass the cache.
    pub source: Arc<dyn MovieSource>,
    pub proxy: Arc<TmdbProxy>,
    pub started_at: DateTime<Utc>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("repository", &self.repository)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the production collaborators: the proxy-routed TMDB client
    /// feeding the repository, and the credential-holding proxy.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client_config = config
            .client_config()
            .context("failed to derive the metadata proxy URL")?;
        let client =
            TmdbClient::new(client_config).context("failed to build TMDB client")?;
        let proxy = TmdbProxy::new(config.proxy_config())
            .context("failed to build TMDB proxy")?;

        Ok(Self::with_source(config, Arc::new(client), proxy))
    }

    /// Same wiring with a caller-supplied movie source.
    pub fn with_source(
        config: Config,
        source: Arc<dyn MovieSource>,
        proxy: TmdbProxy,
    ) -> Self {
        let repository = MovieRepository::new(
            Arc::clone(&source),
            MovieAdapter::new(config.image_urls()),
        )
        .with_policy(config.cache_policy());

        Self {
            config: Arc::new(config),
            repository: Arc::new(repository),
            source,
            proxy: Arc::new(proxy),
            started_at: Utc::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &MovieRepository {
        &self.repository
    }
}
