#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use axum_test::TestServer;
use marquee_core::{
    ListKind, MovieSource, TmdbProxy, UpstreamMovie, UpstreamPage,
    upstream::{UpstreamCredits, UpstreamCrewMember, UpstreamGenre},
};
use marquee_server::{
    AppState, create_app,
    infra::config::{Config, ConfigLoad, ConfigLoader, EnvConfig},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::Mutex};

pub const TEST_TOKEN: &str = "test-read-token";

/// Served by the fake CDN at `/t/p/w500/poster.png` with `image/png`.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-poster";
/// Served at `/t/p/w500/bare.jpg` without a content type.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-still";

/// Movie source with canned answers and call counters.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lists: HashMap<ListKind, UpstreamPage>,
    details: HashMap<u64, UpstreamMovie>,
    searches: HashMap<String, UpstreamPage>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(
        mut self,
        kind: ListKind,
        results: Vec<UpstreamMovie>,
        total_pages: u32,
    ) -> Self {
        self.lists.insert(
            kind,
            UpstreamPage {
                results,
                total_pages,
            },
        );
        self
    }

    pub fn with_detail(mut self, movie: UpstreamMovie) -> Self {
        self.details.insert(movie.id, movie);
        self
    }

    pub fn with_search(
        mut self,
        query: &str,
        results: Vec<UpstreamMovie>,
    ) -> Self {
        self.searches.insert(
            query.to_string(),
            UpstreamPage {
                results,
                total_pages: 1,
            },
        );
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieSource for ScriptedSource {
    async fn fetch_list_page(&self, kind: ListKind, _page: u32) -> UpstreamPage {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.lists
            .get(&kind)
            .cloned()
            .unwrap_or_else(UpstreamPage::empty)
    }

    async fn fetch_by_id(&self, id: u64) -> Option<UpstreamMovie> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details.get(&id).cloned()
    }

    async fn search(&self, query: &str, _page: u32) -> UpstreamPage {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches
            .get(query)
            .cloned()
            .unwrap_or_else(UpstreamPage::empty)
    }
}

/// List-shaped upstream record.
pub fn list_movie(id: u64, title: &str, genre_ids: &[u32]) -> UpstreamMovie {
    UpstreamMovie {
        id,
        title: Some(title.to_string()),
        original_title: Some(title.to_string()),
        release_date: Some("1999-10-15".to_string()),
        vote_average: Some(8.43),
        vote_count: Some(1200),
        popularity: Some(61.4),
        poster_path: Some(format!("/poster-{id}.jpg")),
        backdrop_path: Some(format!("/backdrop-{id}.jpg")),
        overview: Some(format!("Overview of {title}")),
        genre_ids: Some(genre_ids.to_vec()),
        ..UpstreamMovie::default()
    }
}

/// Detail-shaped upstream record with a director in the crew.
pub fn detail_movie(
    id: u64,
    title: &str,
    genres: &[(u32, &str)],
    director: &str,
) -> UpstreamMovie {
    UpstreamMovie {
        id,
        title: Some(title.to_string()),
        original_title: Some(title.to_string()),
        release_date: Some("1999-10-15".to_string()),
        vote_average: Some(8.43),
        runtime: Some(139),
        poster_path: Some(format!("/poster-{id}.jpg")),
        genres: Some(
            genres
                .iter()
                .map(|(id, name)| UpstreamGenre {
                    id: *id,
                    name: name.to_string(),
                })
                .collect(),
        ),
        credits: Some(UpstreamCredits {
            cast: Vec::new(),
            crew: vec![UpstreamCrewMember {
                id: 7467,
                name: director.to_string(),
                job: "Director".to_string(),
                department: Some("Directing".to_string()),
            }],
        }),
        budget: Some(63_000_000),
        revenue: Some(100_853_753),
        ..UpstreamMovie::default()
    }
}

/// Environment for tests: loopback bind, a token and dev-mode CORS.
pub fn test_env() -> EnvConfig {
    EnvConfig {
        server_host: Some("127.0.0.1".to_string()),
        tmdb_access_token: Some(TEST_TOKEN.to_string()),
        dev_mode: Some(true),
        ..EnvConfig::default()
    }
}

pub fn load_config(env: EnvConfig) -> Result<Config> {
    let ConfigLoad { config, .. } = ConfigLoader::new()
        .load_with_env(env)
        .context("failed to load test configuration")?;
    Ok(config)
}

/// State whose repository reads from `source` instead of the network.
pub fn scripted_state(
    config: Config,
    source: Arc<ScriptedSource>,
) -> Result<AppState> {
    let proxy = TmdbProxy::new(config.proxy_config())
        .context("failed to build proxy")?;
    let source: Arc<dyn MovieSource> = source;
    Ok(AppState::with_source(config, source, proxy))
}

pub fn test_server(state: AppState) -> Result<TestServer> {
    TestServer::new(create_app(state)).context("failed to start test server")
}

/// Serves `router` on an ephemeral loopback port until the test ends.
pub async fn spawn_router(router: Router) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

/// Boots the full server on a real port, pointed at `api_base_url`, so the
/// production client goes through the server's own proxy route.
pub async fn spawn_marquee(
    mut env: EnvConfig,
    api_base_url: &str,
) -> Result<(SocketAddr, AppState)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind marquee listener")?;
    let addr = listener.local_addr()?;

    env.server_port = Some(addr.port());
    env.tmdb_api_base_url = Some(api_base_url.to_string());
    let state = AppState::from_config(load_config(env)?)?;

    let router = create_app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((addr, state))
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Stand-in for the TMDB API mounted under `/3`, with a few CDN images
/// under `/t/p`.
#[derive(Debug, Clone, Default)]
pub struct FakeTmdb {
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeTmdb {
    /// Starts the fake and returns its API base URL.
    pub async fn spawn(&self) -> Result<String> {
        let router = Router::new()
            .fallback(fake_tmdb_handler)
            .with_state(self.clone());
        let addr = spawn_router(router).await?;
        Ok(format!("http://{addr}/3"))
    }

    /// Starts the fake and returns its bare origin, for image downloads.
    pub async fn spawn_origin(&self) -> Result<String> {
        let api_base_url = self.spawn().await?;
        Ok(api_base_url.trim_end_matches("/3").to_string())
    }

    pub async fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_for(&self, path: &str) -> Option<RecordedRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .rev()
            .find(|request| request.path == path)
            .cloned()
    }
}

async fn fake_tmdb_handler(
    State(fake): State<FakeTmdb>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let query = uri
        .query()
        .map(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    fake.requests.lock().await.push(RecordedRequest {
        path: uri.path().to_string(),
        query,
        authorization,
    });

    match uri.path() {
        "/3/movie/popular" => axum::Json(json!({
            "page": 1,
            "total_pages": 3,
            "results": [
                {
                    "id": 550,
                    "title": "Fight Club",
                    "original_title": "Fight Club",
                    "release_date": "1999-10-15",
                    "vote_average": 8.433,
                    "vote_count": 26280,
                    "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                    "genre_ids": [18, 53]
                },
                {
                    "id": 807,
                    "title": "Se7en",
                    "original_title": "Se7en",
                    "release_date": "1995-09-22",
                    "vote_average": 8.4,
                    "poster_path": null,
                    "genre_ids": [80, 9648, 53]
                }
            ]
        }))
        .into_response(),
        "/3/movie/top_rated" => (
            [(header::CONTENT_TYPE, "application/json")],
            "{\"results\": [",
        )
            .into_response(),
        "/3/movie/550" => axum::Json(fight_club_detail()).into_response(),
        "/3/search/movie" => axum::Json(json!({
            "page": 1,
            "total_pages": 1,
            "results": [
                { "id": 949, "title": "Heat", "release_date": "1995-12-15", "genre_ids": [28, 80] }
            ]
        }))
        .into_response(),
        "/3/slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            axum::Json(json!({ "late": true })).into_response()
        }
        "/3/configuration" => axum::Json(json!({
            "images": { "secure_base_url": "https://image.tmdb.org/t/p/" }
        }))
        .into_response(),
        "/t/p/w500/poster.png" => {
            ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES).into_response()
        }
        "/t/p/w500/bare.jpg" => Response::new(Body::from(JPEG_BYTES)),
        "/3/account" => (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "status_code": 7, "status_message": "Invalid API key" })),
        )
            .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "status_code": 34, "status_message": "Not found" })),
        )
            .into_response(),
    }
}

fn fight_club_detail() -> Value {
    json!({
        "id": 550,
        "title": "Fight Club",
        "original_title": "Fight Club",
        "release_date": "1999-10-15",
        "vote_average": 8.433,
        "vote_count": 26280,
        "runtime": 139,
        "budget": 63000000,
        "revenue": 100853753,
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "backdrop_path": "/hZkgoQYus5vegHoetLkCJzb17zJ.jpg",
        "genres": [{ "id": 18, "name": "Drama" }, { "id": 53, "name": "Thriller" }],
        "credits": {
            "cast": [
                { "id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": "/8nytsqL59SFJTVYVrN72k6qkGgJ.jpg" },
                { "id": 287, "name": "Brad Pitt", "character": "Tyler Durden", "profile_path": null }
            ],
            "crew": [
                { "id": 7467, "name": "David Fincher", "job": "Director", "department": "Directing" },
                { "id": 7468, "name": "Jim Uhls", "job": "Screenplay", "department": "Writing" }
            ]
        },
        "recommendations": { "results": [] },
        "images": { "backdrops": [], "posters": [] }
    })
}
