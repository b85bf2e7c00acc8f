use axum::{
    Json,
    extract::{Query, State},
};
use marquee_core::upstream::ENDPOINT_PARAM;
use serde_json::Value;
use tracing::{error, warn};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Forwards `?endpoint=<path>&...` to the TMDB API with the server-side
/// credential and returns the JSON untouched.
pub async fn tmdb_proxy_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<Value>> {
    let Some(endpoint) = params
        .iter()
        .find(|(key, _)| key == ENDPOINT_PARAM)
        .map(|(_, value)| value.clone())
        .filter(|value| !value.trim().is_empty())
    else {
        return Err(AppError::bad_request("Missing endpoint parameter"));
    };

    match state.proxy.forward(&endpoint, &params).await {
        Ok(body) => Ok(Json(body)),
        Err(err) => {
            if err.is_timeout() {
                warn!(endpoint = %endpoint, "metadata request timed out");
            } else {
                error!(endpoint = %endpoint, error = %err, "metadata request failed");
            }
            Err(AppError::from(err))
        }
    }
}
