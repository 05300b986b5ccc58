use serde_json::{Value, json};

use crate::fixtures::mock_services::VIDEO_ID;
use crate::fixtures::test_app::TestApp;

// EBML magic, as at the start of every webm clip
const CLIP: &str = "data:video/webm;base64,GkXfow==";

#[tokio::test]
async fn upload_returns_player_url() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json("/api/upload", &json!({ "videoBlob": CLIP, "fileName": "S-100_question_1" }))
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["url"], format!("https://player.vimeo.com/video/{VIDEO_ID}"));
    assert_eq!(json["videoId"], VIDEO_ID);

    let created = app.mock.vimeo_created.lock();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["name"], "S-100_question_1");
    assert_eq!(created[0]["description"], "Test recording response");
    assert_eq!(created[0]["privacy"]["view"], "unlisted");
    assert_eq!(created[0]["folder_uri"], "/folders/555");
    assert_eq!(created[0]["upload"]["size"], 4);

    assert_eq!(*app.mock.tus_uploads.lock(), vec![vec![0x1a, 0x45, 0xdf, 0xa3]]);
}

#[tokio::test]
async fn rejected_credentials_skip_the_upload() {
    let app = TestApp::spawn().await;
    *app.mock.vimeo_authorized.lock() = false;

    let resp = app
        .post_json("/api/upload", &json!({ "videoBlob": CLIP, "fileName": "clip" }))
        .await;

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(
        json["error"],
        "Failed to authenticate with Vimeo. Please check credentials."
    );
    assert!(app.mock.vimeo_created.lock().is_empty());
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = TestApp::spawn().await;

    let resp = app.post_json("/api/upload", &json!({ "fileName": "clip" })).await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Missing required fields");
}

#[tokio::test]
async fn undecodable_clip_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/upload",
            &json!({ "videoBlob": "data:video/webm;base64,%%%", "fileName": "clip" }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Invalid video data");
    assert!(app.mock.vimeo_created.lock().is_empty());
}

#[tokio::test]
async fn missing_player_url_fails_the_upload() {
    let app = TestApp::spawn().await;
    *app.mock.omit_player_url.lock() = true;

    let resp = app
        .post_json("/api/upload", &json!({ "videoBlob": CLIP, "fileName": "clip" }))
        .await;

    assert_eq!(resp.status().as_u16(), 500);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Invalid response from Vimeo");
}
