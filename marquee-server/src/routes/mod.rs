use axum::{Router, routing::get};

use crate::handlers::{diagnostics, image, movies, tmdb};
use crate::infra::app_state::AppState;

/// Route templates, shared with tests and the client URL derivation.
pub mod paths {
    pub const PING: &str = "/ping";
    pub const HEALTH: &str = "/health";

    pub const POPULAR: &str = "/api/movies/popular";
    pub const TOP_RATED: &str = "/api/movies/top-rated";
    pub const SEARCH: &str = "/api/movies/search";
    pub const MOVIE: &str = "/api/movies/{id}";
    pub const RELATED: &str = "/api/movies/{id}/related";

    pub const IMAGE_PROXY: &str = "/api/image";
    pub const TMDB_PROXY: &str = "/api/tmdb";

    pub const CREDITS_PROBE: &str = "/api/diagnostics/credits";

    /// Fills a `{id}` template.
    pub fn with_id(template: &str, id: u64) -> String {
        template.replace("{id}", &id.to_string())
    }
}

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(paths::POPULAR, get(movies::popular_movies_handler))
        .route(paths::TOP_RATED, get(movies::top_rated_movies_handler))
        .route(paths::SEARCH, get(movies::search_movies_handler))
        .route(paths::MOVIE, get(movies::movie_detail_handler))
        .route(paths::RELATED, get(movies::related_movies_handler))
        .route(paths::IMAGE_PROXY, get(image::image_proxy_handler))
        .route(paths::TMDB_PROXY, get(tmdb::tmdb_proxy_handler))
        .route(
            paths::CREDITS_PROBE,
            get(diagnostics::credits_probe_handler),
        )
}
