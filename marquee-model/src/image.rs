/// TMDB image size variants used by the display model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageSize {
    W92,
    W154,
    /// Cast profile thumbnails.
    W185,
    W342,
    #[default]
    W500,
    /// Gallery stills.
    W780,
    W1280,
    H632,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::W1280 => "w1280",
            ImageSize::H632 => "h632",
            ImageSize::Original => "original",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "w92" => Some(ImageSize::W92),
            "w154" => Some(ImageSize::W154),
            "w185" => Some(ImageSize::W185),
            "w342" => Some(ImageSize::W342),
            "w500" => Some(ImageSize::W500),
            "w780" => Some(ImageSize::W780),
            "w1280" => Some(ImageSize::W1280),
            "h632" => Some(ImageSize::H632),
            "original" => Some(ImageSize::Original),
            _ => None,
        }
    }
}
