use serde_json::{Value, json};

use crate::fixtures::mock_services::TranscriptOutcome;
use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn evaluate_scores_completed_transcript() {
    let app = TestApp::spawn().await;
    *app.mock.pending_polls.lock() = 2;

    let resp = app
        .post_json("/api/evaluate", &json!({ "audioUrl": "https://cdn.example.com/clip.webm" }))
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["fluency"], 84);
    assert_eq!(json["pronunciation"], 85);
    assert_eq!(json["intelligibility"], 90);
    assert_eq!(
        json["feedback"]["fluency"],
        "Your speech flow is good but could be more natural. Focus on maintaining a steady pace."
    );
    assert_eq!(
        json["feedback"]["overall"],
        "Overall performance: 86%. Excellent speaking skills! Keep maintaining this high standard."
    );

    assert_eq!(*app.mock.polls.lock(), 3);
    let requests = app.mock.transcript_requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["audio_url"], "https://cdn.example.com/clip.webm");
    assert_eq!(requests[0]["speech_analytics"], true);
}

#[tokio::test]
async fn transcription_error_is_a_generic_failure() {
    let app = TestApp::spawn().await;
    *app.mock.transcript_outcome.lock() = TranscriptOutcome::Error;

    let resp = app
        .post_json("/api/evaluate", &json!({ "audioUrl": "https://cdn.example.com/clip.webm" }))
        .await;

    assert_eq!(resp.status().as_u16(), 500);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json, json!({ "error": "Failed to evaluate speech" }));
}

#[tokio::test]
async fn polling_stops_at_attempt_ceiling() {
    let app = TestApp::spawn().await;
    *app.mock.transcript_outcome.lock() = TranscriptOutcome::Stalled;

    let resp = app
        .post_json("/api/evaluate", &json!({ "audioUrl": "https://cdn.example.com/clip.webm" }))
        .await;

    assert_eq!(resp.status().as_u16(), 500);
    // max_attempts is 5 in the test settings
    assert_eq!(*app.mock.polls.lock(), 5);
}

#[tokio::test]
async fn missing_audio_url_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app.post_json("/api/evaluate", &json!({})).await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Audio URL is required");
    assert!(app.mock.transcript_requests.lock().is_empty());
}

#[tokio::test]
async fn malformed_body_still_returns_error_envelope() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/evaluate"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert!(json["error"].is_string());
}
