//! # Marquee Core
//!
//! The data layer behind the Marquee movie catalogue.
//!
//! - [`upstream`]: the TMDB client (talks to the local proxy route), the
//!   proxy forwarder that holds the credential, and the wire types.
//! - [`adapter`]: pure conversion from upstream records to [`Movie`].
//! - [`image`]: image URL composition and the image proxy allow-list.
//! - [`fallback`]: the compiled-in dataset served when upstream is down.
//! - [`repository`]: the read-through cache every route goes through.
//!
//! Nothing in this crate returns an upstream failure to repository callers;
//! failures degrade to cached or fallback data.

pub mod adapter;
pub mod clock;
pub mod error;
pub mod fallback;
pub mod image;
pub mod repository;
pub mod upstream;

pub use adapter::{MovieAdapter, format_money};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ImageTargetError, UpstreamError};
pub use image::{ALLOWED_IMAGE_HOST, ImageUrlBuilder, validate_image_target};
pub use marquee_model::{ListKind, Movie, MoviePage};
pub use repository::{CachePolicy, MovieRepository, RepositorySnapshot};
pub use upstream::{
    MovieSource, TmdbClient, TmdbClientConfig, TmdbProxy, TmdbProxyConfig,
    UpstreamMovie, UpstreamPage,
};
