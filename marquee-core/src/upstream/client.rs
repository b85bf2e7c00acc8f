use std::time::Duration;

use async_trait::async_trait;
use marquee_model::ListKind;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::proxy::ENDPOINT_PARAM;
use super::types::{UpstreamMovie, UpstreamPage};
use crate::error::UpstreamError;

/// Sub-resources requested alongside a movie detail record.
pub const DETAIL_APPENDS: &str = "credits,recommendations,images";

/// Where movie records come from.
///
/// Implementations never fail: any upstream problem is logged and folded into
/// "no data" (an empty page or `None`), and callers decide how to degrade.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn fetch_list_page(&self, kind: ListKind, page: u32) -> UpstreamPage;

    async fn fetch_by_id(&self, id: u64) -> Option<UpstreamMovie>;

    async fn search(&self, query: &str, page: u32) -> UpstreamPage;
}

#[derive(Debug, Clone)]
pub struct TmdbClientConfig {
    /// The local metadata proxy route, e.g. `http://127.0.0.1:3000/api/tmdb`.
    pub proxy_base_url: Url,
    pub timeout: Duration,
    pub language: String,
}

impl TmdbClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
    pub const DEFAULT_LANGUAGE: &'static str = "en-US";

    pub fn new(proxy_base_url: Url) -> Self {
        Self {
            proxy_base_url,
            timeout: Self::DEFAULT_TIMEOUT,
            language: Self::DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Language prefix used to filter image galleries (`en-US` -> `en`).
    fn image_language(&self) -> &str {
        self.language
            .split(['-', '_'])
            .next()
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or("en")
    }
}

/// TMDB client that goes through the local proxy route.
///
/// The credential is never seen here; the proxy attaches it.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: TmdbClientConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbClientConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &TmdbClientConfig {
        &self.config
    }

    pub async fn fetch_popular_page(&self, page: u32) -> UpstreamPage {
        self.fetch_list_page(ListKind::Popular, page).await
    }

    pub async fn fetch_top_rated_page(&self, page: u32) -> UpstreamPage {
        self.fetch_list_page(ListKind::TopRated, page).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(self.config.proxy_base_url.clone())
            .query(&[(ENDPOINT_PARAM, endpoint)])
            .query(&[("language", self.config.language.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> UpstreamPage {
        match self.get_json::<UpstreamPage>(endpoint, params).await {
            Ok(page) => {
                debug!(endpoint, results = page.results.len(), "upstream page fetched");
                page
            }
            Err(err) => {
                warn!(endpoint, error = %err, "upstream page unavailable");
                UpstreamPage::empty()
            }
        }
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn fetch_list_page(&self, kind: ListKind, page: u32) -> UpstreamPage {
        self.fetch_page(kind.endpoint(), &[("page", page.max(1).to_string())])
            .await
    }

    async fn fetch_by_id(&self, id: u64) -> Option<UpstreamMovie> {
        let endpoint = format!("movie/{id}");
        let params = [
            ("append_to_response", DETAIL_APPENDS.to_string()),
            (
                "include_image_language",
                format!("{},null", self.config.image_language()),
            ),
        ];

        match self.get_json::<UpstreamMovie>(&endpoint, &params).await {
            Ok(movie) => Some(movie),
            Err(err) => {
                warn!(movie_id = id, error = %err, "upstream movie unavailable");
                None
            }
        }
    }

    async fn search(&self, query: &str, page: u32) -> UpstreamPage {
        self.fetch_page(
            "search/movie",
            &[
                ("query", query.to_string()),
                ("page", page.max(1).to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await
    }
}
