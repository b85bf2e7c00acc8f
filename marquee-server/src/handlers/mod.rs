pub mod diagnostics;
pub mod image;
pub mod movies;
pub mod tmdb;
