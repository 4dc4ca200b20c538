use serde::{Deserialize, Serialize};

pub const GET_PLAYLIST_PATH: &str = "get-playlist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub user_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub recommendations: Vec<String>,
    pub playlist_url: String,
}
