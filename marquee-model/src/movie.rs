/// Placeholder director for list records whose crew has not been fetched.
///
/// Records carrying this value are incomplete: a detail lookup is required
/// before they can stand in for a full movie record.
pub const DIRECTOR_PENDING: &str = "needs detail lookup";

/// Text used for any display field whose upstream value is missing.
pub const UNKNOWN: &str = "unknown";

/// A movie as rendered by list and detail views.
///
/// `id` is stable between the list and detail representation of the same
/// movie. Optional fields are omitted from JSON when absent; list records
/// only fill a subset of them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    /// Calendar year of release, `0` when unknown.
    pub year: i32,
    /// Average vote on a 0-10 scale, rounded to one decimal.
    pub rating: f64,
    pub director: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub actors: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genres: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summary: String,
    pub poster_url: String,
    pub duration: String,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub backdrop_url: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub vote_count: Option<u64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub popularity: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub status: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub production_companies: Option<Vec<String>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub production_countries: Option<Vec<String>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub tagline: Option<String>,
    /// Formatted budget, see `marquee_core::adapter::format_money`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub budget: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub revenue: Option<String>,
    /// Spoken languages.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub languages: Option<Vec<String>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub writers: Option<Vec<String>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub cinematographers: Option<Vec<String>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub images: Option<MovieImages>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub cast_details: Option<Vec<CastMember>>,
}

impl Movie {
    /// True when this record came from a list view without crew data.
    pub fn needs_detail_lookup(&self) -> bool {
        self.director == DIRECTOR_PENDING
    }

    /// True when both movies share at least one genre name.
    pub fn shares_genre_with(&self, other: &Movie) -> bool {
        self.genres.iter().any(|genre| other.genres.contains(genre))
    }
}

/// Still and poster gallery for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieImages {
    #[cfg_attr(feature = "serde", serde(default))]
    pub backdrops: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub posters: Vec<String>,
}

impl MovieImages {
    pub fn is_empty(&self) -> bool {
        self.backdrops.is_empty() && self.posters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_url: String,
}

/// One page of a movie listing.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub page: u32,
    pub total_pages: u32,
}

impl MoviePage {
    pub fn new(movies: Vec<Movie>, page: u32, total_pages: u32) -> Self {
        Self {
            movies,
            page,
            total_pages,
        }
    }

    /// A page with no movies and no further pages.
    pub fn empty(page: u32) -> Self {
        Self::new(Vec::new(), page, 0)
    }
}
