use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ApiException, ErrorCode},
    protocol::{PlaylistRequest, PlaylistResponse},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

const ROAD_TRIP_SONGS: [(&str, &str); 10] = [
    ("Willie Nelson", "On The Road Again"),
    ("Rascal Flatts", "Life is a Highway"),
    ("Bruce Springsteen", "Born to Run"),
    ("Chuck Berry", "Route 66"),
    ("Eagles", "Take It Easy"),
    ("The Allman Brothers Band", "Ramblin' Man"),
    ("Johnny Cash", "I've Been Everywhere"),
    ("AC/DC", "Highway to Hell"),
    ("Tom Petty", "Free Fallin'"),
    ("The Beatles", "Drive My Car"),
];

struct AppState {
    playlist_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let app = build_router(Arc::new(AppState {
        playlist_url: settings.playlist_url,
    }));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "stub recommendation service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/get-playlist", post(get_playlist))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_playlist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaylistRequest>,
) -> Result<Json<PlaylistResponse>, (StatusCode, Json<ApiError>)> {
    validate_prompt(&req.user_prompt)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiError::from(e))))?;

    info!(prompt_chars = req.user_prompt.chars().count(), "serving stub playlist");
    Ok(Json(PlaylistResponse {
        recommendations: ROAD_TRIP_SONGS
            .iter()
            .map(|(artist, title)| format!("{artist} - {title}"))
            .collect(),
        playlist_url: state.playlist_url.clone(),
    }))
}

fn validate_prompt(prompt: &str) -> Result<(), ApiException> {
    if prompt.trim().is_empty() {
        return Err(ApiException {
            code: ErrorCode::Validation,
            message: "user_prompt must not be blank".to_string(),
        });
    }
    Ok(())
}
