//! Conversion from upstream TMDB records into the display [`Movie`].
//!
//! Everything here is pure: no I/O, no clock, no shared state.

use chrono::{Datelike, NaiveDate};
use marquee_model::{
    CastMember, DIRECTOR_PENDING, ImageSize, Movie, MovieImages, UNKNOWN,
};

use crate::image::ImageUrlBuilder;
use crate::upstream::{UpstreamCrewMember, UpstreamMovie, UpstreamNamed};

const DETAIL_ACTORS: usize = 5;
const LIST_ACTORS: usize = 3;
const CAST_DETAILS: usize = 10;
const GALLERY_IMAGES: usize = 12;

const WRITER_JOBS: &[&str] = &["Screenplay", "Writer", "Story"];
const CINEMATOGRAPHER_JOBS: &[&str] = &["Director of Photography", "Cinematography"];

/// TMDB's movie genre table. List endpoints only carry `genre_ids`.
const GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Human-readable money amount.
///
/// `0` is `"unknown"`; amounts from 100,000,000 are expressed in
/// hundred-millions and from 10,000 in ten-thousands, both with two decimals.
/// Smaller amounts are printed as-is.
pub fn format_money(amount: u64) -> String {
    if amount == 0 {
        UNKNOWN.to_string()
    } else if amount >= 100_000_000 {
        format!("{:.2} hundred-million", amount as f64 / 100_000_000.0)
    } else if amount >= 10_000 {
        format!("{:.2} ten-thousand", amount as f64 / 10_000.0)
    } else {
        amount.to_string()
    }
}

/// Calendar year of a `YYYY-MM-DD` date, `0` when absent or unparsable.
pub fn release_year(release_date: Option<&str>) -> i32 {
    release_date
        .and_then(|date| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok())
        .map(|date| date.year())
        .unwrap_or(0)
}

pub fn round_rating(vote_average: Option<f64>) -> f64 {
    let value = vote_average.filter(|v| v.is_finite()).unwrap_or(0.0);
    (value * 10.0).round() / 10.0
}

pub fn format_duration(runtime: Option<u32>) -> String {
    match runtime {
        Some(minutes) if minutes > 0 => format!("{minutes} minutes"),
        _ => UNKNOWN.to_string(),
    }
}

fn director_of(movie: &UpstreamMovie) -> Option<String> {
    movie
        .credits
        .as_ref()?
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone())
}

/// One name per matching credit, in crew order. A person credited twice
/// (e.g. Screenplay and Story) appears twice.
fn crew_with_jobs(crew: &[UpstreamCrewMember], jobs: &[&str]) -> Vec<String> {
    crew.iter()
        .filter(|member| jobs.contains(&member.job.as_str()))
        .map(|member| member.name.clone())
        .collect()
}

fn actor_names(movie: &UpstreamMovie, limit: usize) -> Vec<String> {
    movie
        .credits
        .as_ref()
        .map(|credits| {
            credits
                .cast
                .iter()
                .take(limit)
                .map(|member| member.name.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn names(entries: &Option<Vec<UpstreamNamed>>) -> Option<Vec<String>> {
    entries.as_ref().map(|entries| {
        entries
            .iter()
            .filter(|entry| !entry.name.is_empty())
            .map(|entry| entry.name.clone())
            .collect()
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Maps upstream records to display records.
#[derive(Debug, Clone, Default)]
pub struct MovieAdapter {
    images: ImageUrlBuilder,
}

impl MovieAdapter {
    pub fn new(images: ImageUrlBuilder) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    fn titles(movie: &UpstreamMovie) -> (String, String) {
        let title = non_empty(&movie.title)
            .or_else(|| non_empty(&movie.original_title))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let original_title =
            non_empty(&movie.original_title).unwrap_or_else(|| title.clone());
        (title, original_title)
    }

    fn genres(movie: &UpstreamMovie, use_ids: bool) -> Vec<String> {
        if let Some(genres) = &movie.genres {
            return genres
                .iter()
                .filter(|genre| !genre.name.is_empty())
                .map(|genre| genre.name.clone())
                .collect();
        }
        if use_ids && let Some(ids) = &movie.genre_ids {
            return ids
                .iter()
                .filter_map(|id| genre_name(*id))
                .map(str::to_string)
                .collect();
        }
        Vec::new()
    }

    /// Full record for the detail view.
    pub fn adapt_detail(&self, movie: &UpstreamMovie) -> Movie {
        let (title, original_title) = Self::titles(movie);
        let crew = movie
            .credits
            .as_ref()
            .map(|credits| credits.crew.as_slice());

        let cast_details = movie.credits.as_ref().map(|credits| {
            credits
                .cast
                .iter()
                .take(CAST_DETAILS)
                .map(|member| CastMember {
                    id: member.id,
                    name: member.name.clone(),
                    character: member.character.clone().unwrap_or_default(),
                    profile_url: self
                        .images
                        .build(member.profile_path.as_deref(), ImageSize::W185),
                })
                .collect()
        });

        let images = movie.images.as_ref().map(|gallery| MovieImages {
            backdrops: gallery
                .backdrops
                .iter()
                .filter_map(|image| {
                    self.images
                        .build_optional(image.file_path.as_deref(), ImageSize::W780)
                })
                .take(GALLERY_IMAGES)
                .collect(),
            posters: gallery
                .posters
                .iter()
                .filter_map(|image| {
                    self.images
                        .build_optional(image.file_path.as_deref(), ImageSize::W500)
                })
                .take(GALLERY_IMAGES)
                .collect(),
        });

        Movie {
            id: movie.id,
            title,
            original_title,
            year: release_year(movie.release_date.as_deref()),
            rating: round_rating(movie.vote_average),
            director: director_of(movie).unwrap_or_else(|| UNKNOWN.to_string()),
            actors: actor_names(movie, DETAIL_ACTORS),
            genres: Self::genres(movie, false),
            summary: movie.overview.clone().unwrap_or_default(),
            poster_url: self
                .images
                .build(movie.poster_path.as_deref(), ImageSize::W500),
            duration: format_duration(movie.runtime),
            backdrop_url: self
                .images
                .build_optional(movie.backdrop_path.as_deref(), ImageSize::Original),
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            status: non_empty(&movie.status),
            production_companies: names(&movie.production_companies),
            production_countries: names(&movie.production_countries),
            tagline: Some(movie.tagline.clone().unwrap_or_default()),
            budget: Some(format_money(movie.budget.unwrap_or(0))),
            revenue: Some(format_money(movie.revenue.unwrap_or(0))),
            languages: names(&movie.spoken_languages),
            writers: crew.map(|crew| crew_with_jobs(crew, WRITER_JOBS)),
            cinematographers: crew
                .map(|crew| crew_with_jobs(crew, CINEMATOGRAPHER_JOBS)),
            images,
            cast_details,
        }
    }

    /// Reduced record for list views. Without crew data the director is the
    /// [`DIRECTOR_PENDING`] sentinel.
    pub fn adapt_list_item(&self, movie: &UpstreamMovie) -> Movie {
        let (title, original_title) = Self::titles(movie);

        Movie {
            id: movie.id,
            title,
            original_title,
            year: release_year(movie.release_date.as_deref()),
            rating: round_rating(movie.vote_average),
            director: director_of(movie)
                .unwrap_or_else(|| DIRECTOR_PENDING.to_string()),
            actors: actor_names(movie, LIST_ACTORS),
            genres: Self::genres(movie, true),
            summary: movie.overview.clone().unwrap_or_default(),
            poster_url: self
                .images
                .build(movie.poster_path.as_deref(), ImageSize::W500),
            duration: format_duration(movie.runtime),
            backdrop_url: self
                .images
                .build_optional(movie.backdrop_path.as_deref(), ImageSize::W500),
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            tagline: Some(movie.tagline.clone().unwrap_or_default()),
            ..Movie::default()
        }
    }

    pub fn adapt_list(&self, movies: &[UpstreamMovie]) -> Vec<Movie> {
        movies.iter().map(|movie| self.adapt_list_item(movie)).collect()
    }
}
