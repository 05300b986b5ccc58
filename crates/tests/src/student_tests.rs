use serde_json::{Value, json};
use speakcheck_services::records::AirtableClient;
use speakcheck_services::session::{MemoryIdentityStore, StudentContext};

use crate::fixtures::mock_services::{self, KNOWN_STUDENT};
use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn known_student_resolves() {
    let app = TestApp::spawn().await;

    let resp = app.get(&format!("/api/students?id={KNOWN_STUDENT}")).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json, json!({ "id": KNOWN_STUDENT, "first_name": "Alice" }));
    assert_eq!(
        *app.mock.airtable_formulas.lock(),
        vec![format!("{{StudentID}} = '{KNOWN_STUDENT}'")]
    );
}

#[tokio::test]
async fn unknown_student_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/students?id=S-404").await;

    assert_eq!(resp.status().as_u16(), 404);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json, json!({ "error": "Student not found" }));
}

#[tokio::test]
async fn missing_id_is_rejected() {
    let app = TestApp::spawn().await;

    for path in ["/api/students", "/api/students?id="] {
        let resp = app.get(path).await;
        assert_eq!(resp.status().as_u16(), 400);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["error"], "Student ID is required");
    }
    assert!(app.mock.airtable_formulas.lock().is_empty());
}

#[tokio::test]
async fn quotes_in_id_are_escaped() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/students"))
        .query(&[("id", "x' OR TRUE() OR '")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(
        *app.mock.airtable_formulas.lock(),
        vec!["{StudentID} = 'x\\' OR TRUE() OR \\''".to_string()]
    );
}

#[tokio::test]
async fn context_resolves_through_airtable_client() {
    let mock = mock_services::spawn().await;
    let records = AirtableClient::new(&mock.settings().airtable);
    let mut context = StudentContext::load(Box::new(MemoryIdentityStore::default())).unwrap();

    assert!(context.resolve(&records, "S-404").await.unwrap().is_none());
    let identity = context.resolve(&records, KNOWN_STUDENT).await.unwrap().cloned();

    assert_eq!(identity.map(|i| i.first_name).as_deref(), Some("Alice"));
    assert_eq!(context.student_id(), Some(KNOWN_STUDENT));
}
