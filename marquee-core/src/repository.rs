//! Read-through movie cache with fallback orchestration.
//!
//! One process-wide timestamp governs every cached entry. Page 1 of each
//! listing and every detail record share it, so refreshing any listing also
//! revalidates the detail cache. The degraded flag is equally global: a
//! failure on any call biases later detail reads toward the fallback dataset
//! until a live call succeeds.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use marquee_model::{ListKind, Movie, MoviePage};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapter::MovieAdapter;
use crate::clock::{Clock, SystemClock};
use crate::fallback;
use crate::upstream::MovieSource;

pub const DEFAULT_RELATED_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    /// How soon a failed page-1 fetch is retried. Must be shorter than `ttl`.
    pub retry_after_failure: Duration,
}

impl CachePolicy {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_RETRY_AFTER_FAILURE: Duration = Duration::from_secs(60);

    fn ttl_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX)
    }

    /// Backdate applied to the shared timestamp after a failure so the cache
    /// expires `retry_after_failure` from now.
    fn failure_backdate(&self) -> TimeDelta {
        TimeDelta::from_std(self.ttl.saturating_sub(self.retry_after_failure))
            .unwrap_or(TimeDelta::zero())
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Self::DEFAULT_TTL,
            retry_after_failure: Self::DEFAULT_RETRY_AFTER_FAILURE,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedList {
    movies: Vec<Movie>,
    total_pages: u32,
}

#[derive(Debug, Default)]
struct CacheState {
    lists: HashMap<ListKind, CachedList>,
    details: HashMap<u64, Movie>,
    timestamp: Option<DateTime<Utc>>,
    degraded: bool,
}

impl CacheState {
    fn is_valid(&self, now: DateTime<Utc>, policy: &CachePolicy) -> bool {
        self.timestamp
            .is_some_and(|stamp| now - stamp <= policy.ttl_delta())
    }

    /// Adds list records to the detail cache without downgrading records
    /// that already carry full crew data.
    fn backfill(&mut self, movies: &[Movie]) {
        for movie in movies {
            match self.details.get(&movie.id) {
                Some(existing) if !existing.needs_detail_lookup() => {}
                _ => {
                    self.details.insert(movie.id, movie.clone());
                }
            }
        }
    }
}

/// Point-in-time view of the cache, for health reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    pub degraded: bool,
    pub cache_valid: bool,
    /// Seconds since the shared timestamp was last set, if ever.
    pub cache_age_secs: Option<i64>,
    pub cached_lists: Vec<ListKind>,
    pub cached_details: usize,
}

/// The component every movie route goes through.
///
/// Never returns an error: every path ends in live, cached or fallback data.
pub struct MovieRepository {
    source: Arc<dyn MovieSource>,
    adapter: MovieAdapter,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    state: Mutex<CacheState>,
}

impl fmt::Debug for MovieRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MovieRepository")
            .field("policy", &self.policy)
            .field("cached_lists", &state.lists.len())
            .field("cached_details", &state.details.len())
            .field("timestamp", &state.timestamp)
            .field("degraded", &state.degraded)
            .finish_non_exhaustive()
    }
}

impl MovieRepository {
    pub fn new(source: Arc<dyn MovieSource>, adapter: MovieAdapter) -> Self {
        Self {
            source,
            adapter,
            clock: Arc::new(SystemClock),
            policy: CachePolicy::default(),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn adapter(&self) -> &MovieAdapter {
        &self.adapter
    }

    pub fn is_degraded(&self) -> bool {
        self.state.lock().degraded
    }

    /// One page of a listing. Only page 1 is cached; pages below 1 are
    /// treated as page 1.
    pub async fn list_page(&self, kind: ListKind, page: u32) -> MoviePage {
        let page = page.max(1);

        if page == 1 {
            let now = self.clock.now();
            let state = self.state.lock();
            if state.is_valid(now, &self.policy)
                && let Some(cached) = state.lists.get(&kind)
            {
                debug!(list = %kind, "list cache hit");
                return MoviePage::new(cached.movies.clone(), 1, cached.total_pages);
            }
        }

        let upstream = self.source.fetch_list_page(kind, page).await;

        if upstream.is_empty() {
            warn!(list = %kind, page, "no upstream results, serving fallback movies");
            let movies = fallback::all().to_vec();
            let now = self.clock.now();
            let mut state = self.state.lock();
            state.degraded = true;
            if page == 1 {
                state.lists.insert(
                    kind,
                    CachedList {
                        movies: movies.clone(),
                        total_pages: 1,
                    },
                );
                // Clamped: a TTL longer than the calendar range cannot be backdated.
                state.timestamp = Some(
                    now.checked_sub_signed(self.policy.failure_backdate())
                        .unwrap_or(DateTime::<Utc>::MIN_UTC),
                );
            }
            return MoviePage::new(movies, 1, 1);
        }

        let movies = self.adapter.adapt_list(&upstream.results);
        let total_pages = upstream.total_pages.max(1);

        if page == 1 {
            let now = self.clock.now();
            let mut state = self.state.lock();
            state.lists.insert(
                kind,
                CachedList {
                    movies: movies.clone(),
                    total_pages,
                },
            );
            state.timestamp = Some(now);
            state.degraded = false;
            state.backfill(&movies);
            info!(list = %kind, movies = movies.len(), total_pages, "list cache refreshed");
        }

        MoviePage::new(movies, page, total_pages)
    }

    /// A single movie with full detail, or the fallback record with that id.
    pub async fn movie_by_id(&self, id: u64) -> Option<Movie> {
        {
            let now = self.clock.now();
            let state = self.state.lock();
            if state.is_valid(now, &self.policy)
                && let Some(movie) = state.details.get(&id)
                && !movie.needs_detail_lookup()
            {
                debug!(movie_id = id, "detail cache hit");
                return Some(movie.clone());
            }

            if state.degraded
                && let Some(movie) = fallback::find(id)
            {
                debug!(movie_id = id, "degraded, serving fallback record");
                return Some(movie.clone());
            }
        }

        match self.source.fetch_by_id(id).await {
            Some(upstream) => {
                let movie = self.adapter.adapt_detail(&upstream);
                let mut state = self.state.lock();
                state.details.insert(id, movie.clone());
                state.degraded = false;
                Some(movie)
            }
            None => {
                warn!(movie_id = id, "movie unavailable upstream, trying fallback");
                self.state.lock().degraded = true;
                fallback::find(id).cloned()
            }
        }
    }

    /// Popular movies sharing a genre with `id`, excluding the movie itself.
    pub async fn related(&self, id: u64, limit: usize) -> Vec<Movie> {
        if limit == 0 {
            return Vec::new();
        }
        let Some(movie) = self.movie_by_id(id).await else {
            return Vec::new();
        };

        self.list_page(ListKind::Popular, 1)
            .await
            .movies
            .into_iter()
            .filter(|candidate| candidate.id != id && candidate.shares_genre_with(&movie))
            .take(limit)
            .collect()
    }

    /// Live title search. Results are never cached and never replaced by
    /// fallback data.
    pub async fn search(&self, query: &str, page: u32) -> MoviePage {
        let page = page.max(1);
        let query = query.trim();
        if query.is_empty() {
            return MoviePage::empty(page);
        }

        let upstream = self.source.search(query, page).await;
        if upstream.is_empty() {
            return MoviePage::empty(page);
        }

        MoviePage::new(
            self.adapter.adapt_list(&upstream.results),
            page,
            upstream.total_pages.max(1),
        )
    }

    pub fn snapshot(&self) -> RepositorySnapshot {
        let now = self.clock.now();
        let state = self.state.lock();
        let cached_lists: Vec<ListKind> = ListKind::ALL
            .into_iter()
            .filter(|kind| state.lists.contains_key(kind))
            .collect();

        RepositorySnapshot {
            degraded: state.degraded,
            cache_valid: state.is_valid(now, &self.policy),
            cache_age_secs: state.timestamp.map(|stamp| (now - stamp).num_seconds()),
            cached_lists,
            cached_details: state.details.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::upstream::{
        MockMovieSource, UpstreamCredits, UpstreamCrewMember, UpstreamGenre,
        UpstreamMovie, UpstreamPage,
    };
    use marquee_model::DIRECTOR_PENDING;

    fn upstream(id: u64, genre_ids: &[u32]) -> UpstreamMovie {
        UpstreamMovie {
            id,
            title: Some(format!("Movie {id}")),
            release_date: Some("2020-01-01".into()),
            vote_average: Some(7.0),
            genre_ids: Some(genre_ids.to_vec()),
            ..UpstreamMovie::default()
        }
    }

    fn detailed(id: u64, director: &str) -> UpstreamMovie {
        UpstreamMovie {
            id,
            title: Some(format!("Movie {id}")),
            genres: Some(vec![UpstreamGenre {
                id: 18,
                name: "Drama".into(),
            }]),
            credits: Some(UpstreamCredits {
                cast: Vec::new(),
                crew: vec![UpstreamCrewMember {
                    id: 1,
                    name: director.into(),
                    job: "Director".into(),
                    department: Some("Directing".into()),
                }],
            }),
            runtime: Some(120),
            ..UpstreamMovie::default()
        }
    }

    fn page_of(movies: Vec<UpstreamMovie>, total_pages: u32) -> UpstreamPage {
        UpstreamPage {
            results: movies,
            total_pages,
        }
    }

    fn repository(source: MockMovieSource) -> (MovieRepository, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let repo = MovieRepository::new(Arc::new(source), MovieAdapter::default())
            .with_clock(clock.clone());
        (repo, clock)
    }

    #[tokio::test]
    async fn second_page_one_call_within_ttl_is_served_from_cache() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .withf(|kind, page| *kind == ListKind::Popular && *page == 1)
            .times(1)
            .returning(|_, _| page_of(vec![upstream(10, &[18]), upstream(11, &[35])], 7));
        let (repo, clock) = repository(source);

        let first = repo.list_page(ListKind::Popular, 1).await;
        clock.advance(TimeDelta::seconds(300));
        let second = repo.list_page(ListKind::Popular, 1).await;

        assert_eq!(first, second);
        assert_eq!(second.total_pages, 7);
        assert_eq!(second.movies.len(), 2);
        assert!(!repo.is_degraded());
    }

    #[tokio::test]
    async fn expired_cache_goes_back_upstream() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .times(2)
            .returning(|_, _| page_of(vec![upstream(10, &[18])], 1));
        let (repo, clock) = repository(source);

        repo.list_page(ListKind::TopRated, 1).await;
        clock.advance(TimeDelta::seconds(301));
        repo.list_page(ListKind::TopRated, 1).await;
    }

    #[tokio::test]
    async fn list_kinds_are_cached_separately() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .withf(|kind, _| *kind == ListKind::Popular)
            .times(1)
            .returning(|_, _| page_of(vec![upstream(1, &[18])], 1));
        source
            .expect_fetch_list_page()
            .withf(|kind, _| *kind == ListKind::TopRated)
            .times(1)
            .returning(|_, _| page_of(vec![upstream(2, &[18])], 1));
        let (repo, _clock) = repository(source);

        let popular = repo.list_page(ListKind::Popular, 1).await;
        let top = repo.list_page(ListKind::TopRated, 1).await;
        assert_eq!(popular.movies[0].id, 1);
        assert_eq!(top.movies[0].id, 2);
        assert_eq!(repo.list_page(ListKind::TopRated, 1).await.movies[0].id, 2);
    }

    #[tokio::test]
    async fn empty_upstream_serves_fallback_and_marks_degraded() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .returning(|_, _| page_of(Vec::new(), 1));
        let (repo, _clock) = repository(source);

        let page = repo.list_page(ListKind::Popular, 1).await;

        assert_eq!(page.movies, fallback::all().to_vec());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(repo.snapshot().degraded);
    }

    #[tokio::test]
    async fn failed_first_page_is_retried_after_a_minute() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .times(2)
            .returning(|_, _| UpstreamPage::empty());
        let (repo, clock) = repository(source);

        repo.list_page(ListKind::Popular, 1).await;

        clock.advance(TimeDelta::seconds(30));
        let cached = repo.list_page(ListKind::Popular, 1).await;
        assert_eq!(cached.movies.len(), fallback::all().len());

        clock.advance(TimeDelta::seconds(31));
        repo.list_page(ListKind::Popular, 1).await;
    }

    #[tokio::test]
    async fn oversized_ttl_still_serves_fallback() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .times(1)
            .returning(|_, _| UpstreamPage::empty());
        let clock = Arc::new(ManualClock::default());
        let repo = MovieRepository::new(Arc::new(source), MovieAdapter::default())
            .with_clock(clock.clone())
            .with_policy(CachePolicy {
                ttl: Duration::from_secs(9_000_000_000_000),
                retry_after_failure: Duration::from_secs(60),
            });

        let page = repo.list_page(ListKind::Popular, 1).await;
        assert_eq!(page.movies.len(), fallback::all().len());
        assert!(repo.is_degraded());

        let cached = repo.list_page(ListKind::Popular, 1).await;
        assert_eq!(cached.movies.len(), fallback::all().len());
    }

    #[tokio::test]
    async fn later_pages_are_never_cached() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .withf(|_, page| *page == 2)
            .times(2)
            .returning(|_, _| page_of(vec![upstream(30, &[18])], 9));
        let (repo, _clock) = repository(source);

        let page = repo.list_page(ListKind::Popular, 2).await;
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 9);
        repo.list_page(ListKind::Popular, 2).await;

        assert_eq!(repo.snapshot().cached_details, 0);
    }

    #[tokio::test]
    async fn page_zero_is_treated_as_first_page() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .withf(|_, page| *page == 1)
            .times(1)
            .returning(|_, _| page_of(vec![upstream(1, &[18])], 1));
        let (repo, _clock) = repository(source);

        assert_eq!(repo.list_page(ListKind::Popular, 0).await.page, 1);
        assert_eq!(repo.list_page(ListKind::Popular, 1).await.movies[0].id, 1);
    }

    #[tokio::test]
    async fn first_page_backfills_detail_cache_with_incomplete_records() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .returning(|_, _| page_of(vec![upstream(10, &[18]), upstream(11, &[18])], 1));
        source
            .expect_fetch_by_id()
            .withf(|id| *id == 10)
            .times(1)
            .returning(|id| Some(detailed(id, "Greta Gerwig")));
        let (repo, _clock) = repository(source);

        let page = repo.list_page(ListKind::Popular, 1).await;
        assert!(page.movies.iter().all(|m| m.director == DIRECTOR_PENDING));
        assert_eq!(repo.snapshot().cached_details, 2);

        let movie = repo.movie_by_id(10).await.expect("movie 10");
        assert_eq!(movie.director, "Greta Gerwig");

        let again = repo.movie_by_id(10).await.expect("cached movie 10");
        assert_eq!(again, movie);
    }

    #[tokio::test]
    async fn backfill_keeps_complete_detail_records() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_by_id()
            .times(1)
            .returning(|id| Some(detailed(id, "Agnès Varda")));
        source
            .expect_fetch_list_page()
            .times(1)
            .returning(|_, _| page_of(vec![upstream(5, &[18])], 1));
        let (repo, _clock) = repository(source);

        repo.movie_by_id(5).await;
        repo.list_page(ListKind::Popular, 1).await;

        let movie = repo.movie_by_id(5).await.expect("movie 5");
        assert_eq!(movie.director, "Agnès Varda");
    }

    #[tokio::test]
    async fn detail_fetch_reports_crew_director() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_by_id()
            .withf(|id| *id == 550)
            .returning(|id| Some(detailed(id, "David Fincher")));
        let (repo, _clock) = repository(source);

        let movie = repo.movie_by_id(550).await.expect("movie 550");
        assert_eq!(movie.director, "David Fincher");
        assert_eq!(movie.duration, "120 minutes");
        assert!(!repo.is_degraded());
    }

    #[tokio::test]
    async fn always_failing_upstream_degrades_to_fallback() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .returning(|_, _| UpstreamPage::empty());
        source.expect_fetch_by_id().returning(|_| None);
        let (repo, _clock) = repository(source);

        assert_eq!(repo.movie_by_id(2).await.map(|m| m.id), Some(2));
        assert!(repo.is_degraded());
        assert_eq!(repo.movie_by_id(999).await, None);
        assert_eq!(
            repo.list_page(ListKind::TopRated, 3).await.movies.len(),
            fallback::all().len()
        );
    }

    #[tokio::test]
    async fn degraded_flag_short_circuits_fallback_ids_only() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .returning(|_, _| UpstreamPage::empty());
        source
            .expect_fetch_by_id()
            .withf(|id| *id == 550)
            .times(1)
            .returning(|id| Some(detailed(id, "David Fincher")));
        let (repo, _clock) = repository(source);

        repo.list_page(ListKind::Popular, 1).await;
        assert!(repo.is_degraded());

        let fallback_movie = repo.movie_by_id(3).await.expect("fallback 3");
        assert_eq!(fallback_movie.title, "Forrest Gump");

        let live = repo.movie_by_id(550).await.expect("live 550");
        assert_eq!(live.director, "David Fincher");
        assert!(!repo.is_degraded());
    }

    #[tokio::test]
    async fn related_movies_share_a_genre() {
        let mut source = MockMovieSource::new();
        source.expect_fetch_list_page().returning(|_, _| {
            page_of(
                vec![
                    upstream(1, &[18]),
                    upstream(2, &[18, 80]),
                    upstream(3, &[35]),
                    upstream(4, &[18]),
                    upstream(5, &[18]),
                    upstream(6, &[18]),
                ],
                1,
            )
        });
        source
            .expect_fetch_by_id()
            .returning(|id| Some(detailed(id, "Someone")));
        let (repo, _clock) = repository(source);

        let related = repo.related(1, DEFAULT_RELATED_LIMIT).await;
        let ids: Vec<u64> = related.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4, 5, 6]);

        assert!(repo.related(1, 0).await.is_empty());
    }

    #[tokio::test]
    async fn related_for_unknown_movie_is_empty() {
        let mut source = MockMovieSource::new();
        source.expect_fetch_by_id().returning(|_| None);
        source.expect_fetch_list_page().never();
        let (repo, _clock) = repository(source);

        assert!(repo.related(424242, 4).await.is_empty());
    }

    #[tokio::test]
    async fn search_is_live_and_never_falls_back() {
        let mut source = MockMovieSource::new();
        source
            .expect_search()
            .withf(|query, _| query.to_string() == "heat")
            .times(2)
            .returning(|_, _| page_of(vec![upstream(949, &[80])], 2));
        source
            .expect_search()
            .withf(|query, _| query.to_string() == "nothing")
            .returning(|_, _| UpstreamPage::empty());
        let (repo, _clock) = repository(source);

        let found = repo.search("  heat ", 1).await;
        assert_eq!(found.movies[0].id, 949);
        assert_eq!(found.total_pages, 2);
        repo.search("heat", 1).await;

        let missing = repo.search("nothing", 3).await;
        assert_eq!(missing, MoviePage::empty(3));
        assert!(!repo.is_degraded());
        assert_eq!(repo.snapshot().cached_details, 0);
    }

    #[tokio::test]
    async fn blank_search_does_not_call_upstream() {
        let mut source = MockMovieSource::new();
        source.expect_search().never();
        let (repo, _clock) = repository(source);

        assert_eq!(repo.search("   ", 1).await, MoviePage::empty(1));
    }

    #[tokio::test]
    async fn snapshot_reports_cache_age() {
        let mut source = MockMovieSource::new();
        source
            .expect_fetch_list_page()
            .returning(|_, _| page_of(vec![upstream(1, &[18])], 1));
        let (repo, clock) = repository(source);

        let empty = repo.snapshot();
        assert!(!empty.cache_valid);
        assert_eq!(empty.cache_age_secs, None);

        repo.list_page(ListKind::Popular, 1).await;
        clock.advance(TimeDelta::seconds(42));

        let snapshot = repo.snapshot();
        assert!(snapshot.cache_valid);
        assert_eq!(snapshot.cache_age_secs, Some(42));
        assert_eq!(snapshot.cached_lists, vec![ListKind::Popular]);
        assert_eq!(snapshot.cached_details, 1);
    }
}
