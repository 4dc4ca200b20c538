//! Plain-text screens for each session phase.

use std::fmt::Write as _;

use client_core::{Phase, Session};
use shared::domain::{Song, PRESET_PROMPTS};

pub const HOW_IT_WORKS: &str = "1. Enter your mood or desired vibe\n\
2. Our AI analyzes your input\n\
3. Get a curated playlist that matches your mood";

pub fn screen(session: &Session) -> String {
    match session.phase() {
        Phase::Idle => idle(),
        Phase::Submitting => format!("Creating your mood playlist\n  {}", session.words().join(" ")),
        Phase::Waiting => "  ...".to_string(),
        Phase::Ready => ready(session),
        Phase::Failed => failed(session),
    }
}

pub fn presets() -> String {
    let mut out = String::from("Try one of these:\n");
    for (index, prompt) in PRESET_PROMPTS.iter().enumerate() {
        let _ = writeln!(out, "  :preset {}  {}", index + 1, prompt.replace('\n', " "));
    }
    out
}

fn idle() -> String {
    "Mood Tunes\n\
Discover the perfect playlist based on your current mood.\n\
Describe your music mood (:presets, :help, :reset, :quit)"
        .to_string()
}

fn ready(session: &Session) -> String {
    let Some(recommendation) = session.result() else {
        return String::new();
    };

    let mut out = String::from("Your Mood Playlist\n");
    for (index, song) in recommendation.parsed_songs().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", index + 1, song_line(&song));
        let _ = writeln!(out, "     {}", song.youtube_search_url());
    }
    let _ = writeln!(out, "Listen to full playlist: {}", recommendation.playlist_url);
    out.push_str("Discover a new mood with :reset");
    out
}

fn song_line(song: &Song<'_>) -> String {
    if song.title.is_empty() {
        song.artist.to_string()
    } else {
        format!("{} by {}", song.title, song.artist)
    }
}

fn failed(session: &Session) -> String {
    format!(
        "{}\nTry again with :reset",
        session.error().unwrap_or_default()
    )
}
