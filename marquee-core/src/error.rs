use thiserror::Error;

/// Failure talking to the upstream metadata API or its proxy.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream responded with status {0}")]
    Status(u16),

    #[error("upstream transport error: {0}")]
    Transport(String),

    #[error("malformed upstream payload: {0}")]
    Decode(String),

    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout)
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode(err.to_string())
    }
}

/// Rejection reasons for the image proxy target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageTargetError {
    #[error("missing url parameter")]
    Missing,

    #[error("invalid image url: {0}")]
    Invalid(String),

    #[error("image host not allowed: {0}")]
    HostNotAllowed(String),
}
