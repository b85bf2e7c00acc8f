use std::panic::AssertUnwindSafe;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use futures_util::FutureExt;
use marquee_core::repository::DEFAULT_RELATED_LIMIT;
use marquee_model::{ListKind, Movie, MoviePage};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Upper bound for `?limit=` on related movies.
const MAX_RELATED_LIMIT: usize = 20;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RelatedMovies {
    pub movies: Vec<Movie>,
}

/// Unparsable or missing page numbers mean page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Runs a repository call and turns a panic into a 500 instead of dropping
/// the connection.
async fn guarded<F, T>(operation: &'static str, fut: F) -> AppResult<T>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(fut).catch_unwind().await.map_err(|_| {
        error!(operation, "movie repository call panicked");
        AppError::internal("Failed to load movies")
    })
}

async fn list_handler(
    state: AppState,
    kind: ListKind,
    query: PageQuery,
) -> AppResult<Json<MoviePage>> {
    let page = parse_page(query.page.as_deref());
    let movies = guarded(
        "list_page",
        state.repository().list_page(kind, page),
    )
    .await?;
    Ok(Json(movies))
}

pub async fn popular_movies_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<MoviePage>> {
    list_handler(state, ListKind::Popular, query).await
}

pub async fn top_rated_movies_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<MoviePage>> {
    list_handler(state, ListKind::TopRated, query).await
}

pub async fn search_movies_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<MoviePage>> {
    let Some(text) = query.query else {
        return Err(AppError::bad_request("Missing query parameter"));
    };
    let page = parse_page(query.page.as_deref());

    let results =
        guarded("search", state.repository().search(&text, page)).await?;
    Ok(Json(results))
}

pub async fn movie_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Movie>> {
    guarded("movie_by_id", state.repository().movie_by_id(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Movie {id} not found")))
}

pub async fn related_movies_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<RelatedQuery>,
) -> AppResult<Json<RelatedMovies>> {
    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_RELATED_LIMIT)
        .min(MAX_RELATED_LIMIT);

    let movies =
        guarded("related", state.repository().related(id, limit)).await?;
    Ok(Json(RelatedMovies { movies }))
}
