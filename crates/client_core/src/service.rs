use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Recommendation,
    protocol::{PlaylistRequest, PlaylistResponse, GET_PLAYLIST_PATH},
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::RecommendationError};

#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, prompt: &str) -> Result<Recommendation, RecommendationError>;
}

pub struct HttpRecommendationService {
    http: Client,
    endpoint: Url,
}

impl HttpRecommendationService {
    pub fn new(settings: &ClientSettings) -> Result<Self, RecommendationError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: playlist_endpoint(&settings.service_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    async fn recommend(&self, prompt: &str) -> Result<Recommendation, RecommendationError> {
        debug!(endpoint = %self.endpoint, "requesting playlist");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&PlaylistRequest {
                user_prompt: prompt.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecommendationError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let playlist: PlaylistResponse = serde_json::from_slice(&body)
            .map_err(|error| RecommendationError::Decode(error.to_string()))?;
        debug!(songs = playlist.recommendations.len(), "playlist received");
        Ok(playlist.into())
    }
}

/// Resolves `get-playlist` under the base url, keeping any path prefix.
fn playlist_endpoint(service_url: &str) -> Result<Url, RecommendationError> {
    let invalid = |reason: String| RecommendationError::InvalidUrl {
        url: service_url.to_string(),
        reason,
    };

    let mut base = Url::parse(service_url.trim()).map_err(|error| invalid(error.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("url cannot be a base".to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(GET_PLAYLIST_PATH)
        .map_err(|error| invalid(error.to_string()))
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
