//! Wire shapes returned by the TMDB v3 API.
//!
//! Every field tolerates `null` or absence. These records are transient: the
//! adapter turns them into [`marquee_model::Movie`] and they are dropped.

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Option<Vec<UpstreamGenre>>,
    /// Present on list endpoints instead of `genres`.
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
    #[serde(default)]
    pub credits: Option<UpstreamCredits>,
    #[serde(default)]
    pub recommendations: Option<UpstreamRecommendations>,
    #[serde(default)]
    pub images: Option<UpstreamImages>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub production_companies: Option<Vec<UpstreamNamed>>,
    #[serde(default)]
    pub production_countries: Option<Vec<UpstreamNamed>>,
    #[serde(default)]
    pub spoken_languages: Option<Vec<UpstreamNamed>>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamGenre {
    #[serde(default)]
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Any `{ "name": ... }` entry: companies, countries, languages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamNamed {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamCredits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<UpstreamCastMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<UpstreamCrewMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamCastMember {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamCrewMember {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamRecommendations {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<UpstreamMovie>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamImages {
    #[serde(default, deserialize_with = "null_as_default")]
    pub backdrops: Vec<UpstreamImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posters: Vec<UpstreamImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamImage {
    #[serde(default)]
    pub file_path: Option<String>,
}

fn one_page() -> u32 {
    1
}

/// One page of an upstream listing.
///
/// `results` is required: a payload without it does not decode and is
/// treated as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamPage {
    pub results: Vec<UpstreamMovie>,
    #[serde(default = "one_page")]
    pub total_pages: u32,
}

impl UpstreamPage {
    /// The "no data" page every client failure folds into.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total_pages: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
