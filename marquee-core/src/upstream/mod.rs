//! Upstream metadata access: the client used by the repository, the
//! credential-holding proxy forwarder, and the wire types both speak.

pub mod client;
pub mod proxy;
pub mod types;

pub use client::{DETAIL_APPENDS, MovieSource, TmdbClient, TmdbClientConfig};
pub use proxy::{ENDPOINT_PARAM, TmdbProxy, TmdbProxyConfig};
pub use types::{
    UpstreamCastMember, UpstreamCredits, UpstreamCrewMember, UpstreamGenre,
    UpstreamImage, UpstreamImages, UpstreamMovie, UpstreamNamed, UpstreamPage,
    UpstreamRecommendations,
};

#[cfg(test)]
pub use client::MockMovieSource;
