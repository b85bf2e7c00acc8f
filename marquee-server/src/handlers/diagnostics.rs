use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

/// Fight Club, a record with well-populated credits.
pub const DEFAULT_PROBE_MOVIE: u64 = 550;

#[derive(Debug, Default, Deserialize)]
pub struct CreditsProbeQuery {
    pub id: Option<String>,
}

/// Fetches one movie straight from upstream, bypassing the cache, and
/// reports what the credits look like before and after adaptation.
pub async fn credits_probe_handler(
    State(state): State<AppState>,
    Query(query): Query<CreditsProbeQuery>,
) -> Json<Value> {
    let movie_id = query
        .id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_PROBE_MOVIE);

    let Some(upstream) = state.source.fetch_by_id(movie_id).await else {
        return Json(json!({
            "success": false,
            "movieId": movie_id,
            "message": "Unable to fetch movie data from upstream",
        }));
    };

    let crew = upstream
        .credits
        .as_ref()
        .map(|credits| credits.crew.as_slice())
        .unwrap_or_default();
    let director = crew.iter().find(|member| member.job == "Director").map(|member| {
        json!({
            "id": member.id,
            "name": member.name,
            "job": member.job,
            "department": member.department,
        })
    });
    let adapted = state.repository().adapter().adapt_detail(&upstream);

    Json(json!({
        "success": true,
        "movieId": movie_id,
        "title": upstream.title,
        "originalTitle": upstream.original_title,
        "creditsExist": upstream.credits.is_some(),
        "crewCount": crew.len(),
        "director": director,
        "adaptedDirector": adapted.director,
    }))
}
