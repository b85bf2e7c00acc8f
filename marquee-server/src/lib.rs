//! # Marquee Server
//!
//! HTTP front for the Marquee movie catalogue.
//!
//! - `/api/movies/*`: listings, detail, related titles and search, all served
//!   through the cached [`marquee_core::MovieRepository`]
//! - `/api/tmdb`: credential-holding passthrough to the TMDB API
//! - `/api/image`: allow-listed image passthrough with a one-day cache header
//! - `/ping`, `/health`: liveness and cache state

pub mod app;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use app::create_app;
pub use infra::app_state::AppState;
