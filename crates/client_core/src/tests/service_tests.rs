use std::{sync::Arc, time::Duration};

use axum::{http::StatusCode, routing::post, Json, Router};
use shared::protocol::PlaylistResponse;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

use super::*;
use crate::{controller::SessionController, session::Phase};

async fn spawn_service(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn settings_for(service_url: String) -> ClientSettings {
    ClientSettings {
        service_url,
        min_loading_delay_ms: 20,
        request_timeout_secs: 5,
    }
}

async fn spawn_playlist_service() -> (String, oneshot::Receiver<PlaylistRequest>) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let app = Router::new().route(
        "/get-playlist",
        post(move |Json(payload): Json<PlaylistRequest>| {
            let tx = Arc::clone(&tx);
            async move {
                if let Some(tx) = tx.lock().await.take() {
                    let _ = tx.send(payload);
                }
                Json(PlaylistResponse {
                    recommendations: vec!["Tom Petty - Free Fallin'".to_string()],
                    playlist_url: "https://youtube.com/playlist?list=1".to_string(),
                })
            }
        }),
    );
    (spawn_service(app).await, rx)
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let url = playlist_endpoint("https://example.com").expect("url");
    assert_eq!(url.as_str(), "https://example.com/get-playlist");

    let url = playlist_endpoint("http://127.0.0.1:8080/api").expect("url");
    assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/get-playlist");

    let url = playlist_endpoint("http://127.0.0.1:8080/api/").expect("url");
    assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/get-playlist");
}

#[test]
fn rejects_unusable_service_url() {
    let err = playlist_endpoint("not a url").expect_err("must fail");
    assert!(matches!(err, RecommendationError::InvalidUrl { .. }));

    let err = playlist_endpoint("mailto:someone@example.com").expect_err("must fail");
    assert!(matches!(err, RecommendationError::InvalidUrl { .. }));
}

#[tokio::test]
async fn posts_user_prompt_and_decodes_playlist() {
    let (server_url, payload_rx) = spawn_playlist_service().await;
    let service = HttpRecommendationService::new(&settings_for(server_url)).expect("service");

    let recommendation = service
        .recommend("Sing along 2000s pop songs\nfor a road trip")
        .await
        .expect("recommend");

    let payload = payload_rx.await.expect("payload");
    assert_eq!(
        payload.user_prompt,
        "Sing along 2000s pop songs\nfor a road trip"
    );
    assert_eq!(recommendation.songs, vec!["Tom Petty - Free Fallin'"]);
    assert_eq!(
        recommendation.playlist_url,
        "https://youtube.com/playlist?list=1"
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let app = Router::new().route(
        "/get-playlist",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let service =
        HttpRecommendationService::new(&settings_for(spawn_service(app).await)).expect("service");

    let err = service.recommend("anything").await.expect_err("must fail");
    assert!(
        matches!(err, RecommendationError::Status { status: 500 }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let app = Router::new().route(
        "/get-playlist",
        post(|| async { Json(serde_json::json!({ "songs": ["wrong shape"] })) }),
    );
    let service =
        HttpRecommendationService::new(&settings_for(spawn_service(app).await)).expect("service");

    let err = service.recommend("anything").await.expect_err("must fail");
    assert!(
        matches!(err, RecommendationError::Decode(_)),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service =
        HttpRecommendationService::new(&settings_for(format!("http://{addr}"))).expect("service");
    let err = service.recommend("anything").await.expect_err("must fail");
    assert!(
        matches!(err, RecommendationError::Transport(_)),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn controller_reaches_ready_over_http() {
    let (server_url, _payload_rx) = spawn_playlist_service().await;
    let settings = settings_for(server_url);
    let service = HttpRecommendationService::new(&settings).expect("service");
    let mut controller = SessionController::new(service, settings.min_loading_delay());

    assert!(controller.submit("road trip classics"));
    let session = tokio::time::timeout(Duration::from_secs(10), controller.settle())
        .await
        .expect("settled in time");

    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.words(), ["road", "trip", "classics"]);
    assert_eq!(
        session.result().map(|r| r.songs.clone()),
        Some(vec!["Tom Petty - Free Fallin'".to_string()])
    );
}

#[tokio::test]
async fn controller_fails_with_static_message_over_http() {
    let app = Router::new().route(
        "/get-playlist",
        post(|| async { StatusCode::BAD_GATEWAY }),
    );
    let settings = settings_for(spawn_service(app).await);
    let service = HttpRecommendationService::new(&settings).expect("service");
    let mut controller = SessionController::new(service, settings.min_loading_delay());

    controller.submit("anything");
    let session = tokio::time::timeout(Duration::from_secs(10), controller.settle())
        .await
        .expect("settled in time");

    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(
        session.error(),
        Some(shared::error::RECOMMENDATION_FAILED_MESSAGE)
    );
}
