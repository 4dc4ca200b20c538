use serde::{Deserialize, Serialize};

use crate::protocol::PlaylistResponse;

/// Longest query the input accepts, counted in characters.
pub const MAX_QUERY_CHARS: usize = 250;

pub const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

const SONG_SEPARATOR: &str = " - ";

pub const PRESET_PROMPTS: [&str; 3] = [
    "90s house music for a party\nDisclosure style",
    "Sing along 2000s pop songs\nfor a road trip",
    "Relaxing ambient music\nfor a yoga class",
];

/// A decoded playlist suggestion. Entries in `songs` are `"Artist - Title"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub songs: Vec<String>,
    pub playlist_url: String,
}

impl Recommendation {
    pub fn parsed_songs(&self) -> impl Iterator<Item = Song<'_>> {
        self.songs.iter().map(|entry| Song::parse(entry))
    }
}

impl From<PlaylistResponse> for Recommendation {
    fn from(value: PlaylistResponse) -> Self {
        Self {
            songs: value.recommendations,
            playlist_url: value.playlist_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Song<'a> {
    pub artist: &'a str,
    pub title: &'a str,
}

impl<'a> Song<'a> {
    /// Splits on the first `" - "`. Without a separator the whole entry is the artist.
    pub fn parse(entry: &'a str) -> Self {
        match entry.split_once(SONG_SEPARATOR) {
            Some((artist, title)) => Self { artist, title },
            None => Self {
                artist: entry,
                title: "",
            },
        }
    }

    pub fn youtube_search_url(&self) -> String {
        format!(
            "{YOUTUBE_SEARCH_URL}{}+-+{}",
            urlencoding::encode(self.artist),
            urlencoding::encode(self.title)
        )
    }
}

pub fn truncate_query(text: &str) -> String {
    text.chars().take(MAX_QUERY_CHARS).collect()
}

pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
