//! Display model definitions shared across Marquee crates.

pub mod image;
pub mod list_kind;
pub mod movie;

pub use image::ImageSize;
pub use list_kind::{ListKind, ParseListKindError};
pub use movie::{
    CastMember, DIRECTOR_PENDING, Movie, MovieImages, MoviePage, UNKNOWN,
};
