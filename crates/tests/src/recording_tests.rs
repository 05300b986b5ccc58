use serde_json::{Value, json};

use crate::fixtures::mock_services::CREATED_RECORD;
use crate::fixtures::test_app::TestApp;

fn recording_body() -> Value {
    json!({
        "studentId": "S-100",
        "questionId": "free_3",
        "videoUrl": "https://player.vimeo.com/video/76979871",
        "questionNumber": 2
    })
}

#[tokio::test]
async fn create_recording_persists_fields() {
    let app = TestApp::spawn().await;

    let resp = app.post_json("/api/recordings", &recording_body()).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json, json!({ "success": true, "id": CREATED_RECORD }));

    let created = app.mock.airtable_created.lock();
    assert_eq!(created.len(), 1);
    let (table, body) = &created[0];
    assert_eq!(table, "Recordings");
    let fields = &body["records"][0]["fields"];
    assert_eq!(fields["StudentID"], json!(["S-100"]));
    assert_eq!(fields["QuestionNumber"], 2);
    assert_eq!(fields["QuestionID"], "free_3");
    assert_eq!(fields["VideoURL"], "https://player.vimeo.com/video/76979871");
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = TestApp::spawn().await;

    for field in ["studentId", "questionId", "videoUrl"] {
        let mut body = recording_body();
        body.as_object_mut().unwrap().remove(field);

        let resp = app.post_json("/api/recordings", &body).await;
        assert_eq!(resp.status().as_u16(), 400, "without {field}");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["error"], "Missing required fields");
    }
    assert!(app.mock.airtable_created.lock().is_empty());
}

#[tokio::test]
async fn invalid_video_url_fails_validation() {
    let app = TestApp::spawn().await;
    let mut body = recording_body();
    body["videoUrl"] = json!("not a url");

    let resp = app.post_json("/api/recordings", &body).await;

    assert_eq!(resp.status().as_u16(), 422);
    assert!(app.mock.airtable_created.lock().is_empty());
}

#[tokio::test]
async fn missing_fields_take_precedence_over_validation() {
    let app = TestApp::spawn().await;
    let mut body = recording_body();
    body["videoUrl"] = json!("not a url");
    body.as_object_mut().unwrap().remove("studentId");

    let resp = app.post_json("/api/recordings", &body).await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Missing required fields");
}

#[tokio::test]
async fn record_store_rejection_surfaces_its_status() {
    let app = TestApp::spawn().await;
    *app.mock.airtable_reject.lock() = Some(422);

    let resp = app.post_json("/api/recordings", &recording_body()).await;

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Failed to create record in Airtable");
    assert_eq!(
        json["details"],
        "Field \"StudentID\" cannot accept the provided value"
    );
}

#[tokio::test]
async fn record_store_permission_error_passes_through() {
    let app = TestApp::spawn().await;
    *app.mock.airtable_reject.lock() = Some(403);

    let resp = app.post_json("/api/recordings", &recording_body()).await;

    assert_eq!(resp.status().as_u16(), 403);
}
