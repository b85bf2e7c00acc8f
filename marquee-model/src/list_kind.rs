use std::fmt;
use std::str::FromStr;

/// The curated listings the catalogue exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ListKind {
    Popular,
    TopRated,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::Popular, ListKind::TopRated];

    /// Upstream endpoint path, relative to the API root.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ListKind::Popular => "movie/popular",
            ListKind::TopRated => "movie/top_rated",
        }
    }

    /// Route slug used under `/api/movies/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Popular => "popular",
            ListKind::TopRated => "top-rated",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseListKindError(pub String);

impl fmt::Display for ParseListKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown movie list '{}'", self.0)
    }
}

impl std::error::Error for ParseListKindError {}

impl FromStr for ListKind {
    type Err = ParseListKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(ListKind::Popular),
            "top-rated" | "top_rated" => Ok(ListKind::TopRated),
            other => Err(ParseListKindError(other.to_string())),
        }
    }
}
