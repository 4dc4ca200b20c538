use thiserror::Error;

/// Why a recommendation request failed. Logged, never shown to the user.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("invalid service url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("recommendation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("recommendation service returned status {status}")]
    Status { status: u16 },
    #[error("malformed recommendation body: {0}")]
    Decode(String),
}
