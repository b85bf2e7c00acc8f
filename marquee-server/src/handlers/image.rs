use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use marquee_core::{UpstreamError, validate_image_target};
use serde::Deserialize;
use tracing::warn;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

/// Streams an allow-listed TMDB image through this server.
pub async fn image_proxy_handler(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> AppResult<Response> {
    let target = validate_image_target(query.url.as_deref())?;

    let upstream = state.proxy.fetch_image(&target).await.map_err(|err| {
        warn!(url = %target, error = %err, "image fetch failed");
        match err {
            UpstreamError::Status(code) => AppError::with_status(
                StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("Image upstream responded with status {code}"),
            ),
            UpstreamError::Timeout => AppError::bad_gateway("Image request timed out"),
            other => AppError::bad_gateway(format!("Failed to fetch image: {other}")),
        }
    })?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static(IMAGE_CACHE_CONTROL),
            ),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}
