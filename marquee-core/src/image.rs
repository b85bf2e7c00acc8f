use marquee_model::ImageSize;
use url::{Url, form_urlencoded};

use crate::error::ImageTargetError;

/// The only host the image proxy will fetch from.
pub const ALLOWED_IMAGE_HOST: &str = "image.tmdb.org";

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Shown whenever a record has no artwork.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-movie.jpg";

/// Local route serving proxied image bytes.
pub const IMAGE_PROXY_ROUTE: &str = "/api/image";

/// Composes display URLs for upstream artwork paths.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base_url: String,
    proxied: bool,
}

impl Default for ImageUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL, true)
    }
}

impl ImageUrlBuilder {
    pub fn new(base_url: impl Into<String>, proxied: bool) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, proxied }
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    /// `{base}/{size}{path}`, wrapped in the image proxy route when proxying
    /// is on. An absent or empty path yields the placeholder.
    pub fn build(&self, path: Option<&str>, size: ImageSize) -> String {
        let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
            return PLACEHOLDER_IMAGE.to_string();
        };

        let separator = if path.starts_with('/') { "" } else { "/" };
        let direct = format!("{}/{}{separator}{path}", self.base_url, size.as_str());

        if self.proxied {
            let encoded: String =
                form_urlencoded::byte_serialize(direct.as_bytes()).collect();
            format!("{IMAGE_PROXY_ROUTE}?url={encoded}")
        } else {
            direct
        }
    }

    /// Same as [`build`](Self::build) but `None` when there is no artwork.
    pub fn build_optional(
        &self,
        path: Option<&str>,
        size: ImageSize,
    ) -> Option<String> {
        path.map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| self.build(Some(p), size))
    }
}

/// Parses the image proxy `url` parameter and checks it against the host
/// allow-list. Nothing outside `https://image.tmdb.org/` is fetched.
pub fn validate_image_target(raw: Option<&str>) -> Result<Url, ImageTargetError> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(ImageTargetError::Missing)?;

    let url =
        Url::parse(raw).map_err(|err| ImageTargetError::Invalid(err.to_string()))?;

    let host = url.host_str().unwrap_or_default();
    if url.scheme() != "https"
        || host != ALLOWED_IMAGE_HOST
        || url.port().is_some()
        || !url.username().is_empty()
        || url.password().is_some()
    {
        return Err(ImageTargetError::HostNotAllowed(raw.to_string()));
    }

    Ok(url)
}
