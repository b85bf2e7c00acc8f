use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::UpstreamError;

/// Query parameter naming the upstream path; never forwarded.
pub const ENDPOINT_PARAM: &str = "endpoint";

#[derive(Clone)]
pub struct TmdbProxyConfig {
    /// API root, e.g. `https://api.themoviedb.org/3`.
    pub api_base_url: Url,
    pub access_token: Option<String>,
    pub timeout: Duration,
    /// Scheme, host and port image downloads are sent to instead of the
    /// validated target's own origin. The target path and query are kept.
    pub image_origin: Option<Url>,
}

impl TmdbProxyConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_base_url: Url, access_token: Option<String>) -> Self {
        Self {
            api_base_url,
            access_token,
            timeout: Self::DEFAULT_TIMEOUT,
            image_origin: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_image_origin(mut self, origin: Option<Url>) -> Self {
        self.image_origin = origin;
        self
    }
}

impl fmt::Debug for TmdbProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbProxyConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .field("image_origin", &self.image_origin.as_ref().map(Url::as_str))
            .finish()
    }
}

/// Server-side forwarder that owns the upstream credential.
///
/// Also fetches poster and still bytes for the image route, with the same
/// timeout budget.
#[derive(Debug, Clone)]
pub struct TmdbProxy {
    http: reqwest::Client,
    config: TmdbProxyConfig,
}

impl TmdbProxy {
    pub fn new(config: TmdbProxyConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn has_credential(&self) -> bool {
        self.config.access_token.is_some()
    }

    /// Absolute upstream URL for `endpoint` with every passthrough parameter
    /// except `endpoint` itself.
    pub fn endpoint_url(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Url, UpstreamError> {
        let path = endpoint.trim().trim_start_matches('/');
        if path.is_empty() {
            return Err(UpstreamError::InvalidRequest(
                "endpoint is empty".to_string(),
            ));
        }
        if path.contains("..") || path.contains("://") || path.contains('?') {
            return Err(UpstreamError::InvalidRequest(format!(
                "endpoint '{path}' is not a plain API path"
            )));
        }

        let base = self.config.api_base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}")).map_err(|err| {
            UpstreamError::InvalidRequest(format!("endpoint '{path}': {err}"))
        })?;

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                if key != ENDPOINT_PARAM {
                    query.append_pair(key, value);
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }

    /// Forwards one metadata request and returns the upstream JSON verbatim.
    pub async fn forward(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        let url = self.endpoint_url(endpoint, params)?;
        debug!(endpoint, "forwarding metadata request");

        let mut request = self.http.get(url).header(ACCEPT, "application/json");
        match &self.config.access_token {
            Some(token) => {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            None => warn!(endpoint, "forwarding without an upstream credential"),
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Where an image download for `target` is actually sent.
    pub fn image_request_url(&self, target: &Url) -> Url {
        match &self.config.image_origin {
            Some(origin) => {
                let mut url = origin.clone();
                url.set_path(target.path());
                url.set_query(target.query());
                url
            }
            None => target.clone(),
        }
    }

    /// Opens an image download. The caller is expected to have validated
    /// `target` against the image host allow-list.
    pub async fn fetch_image(
        &self,
        target: &Url,
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = self.image_request_url(target);
        debug!(%url, "fetching image");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        Ok(response)
    }
}
