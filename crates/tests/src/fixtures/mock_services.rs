//! In-process stand-ins for AssemblyAI, Vimeo and Airtable.
//!
//! One axum server answers all three APIs so the real HTTP clients can be
//! exercised end to end.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use speakcheck_config::Settings;
use tokio::net::TcpListener;

pub const ASSEMBLY_AI_KEY: &str = "test-aai-key";
pub const AIRTABLE_KEY: &str = "test-pat";
pub const AIRTABLE_BASE: &str = "appTEST";
pub const VIMEO_TOKEN: &str = "test-vimeo-token";
pub const VIMEO_FOLDER: &str = "555";
pub const VIDEO_ID: &str = "76979871";
pub const KNOWN_STUDENT: &str = "S-100";
pub const CREATED_RECORD: &str = "recNEW123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptOutcome {
    Completed,
    Error,
    /// Never leaves `processing`.
    Stalled,
}

pub struct MockState {
    pub base_url: String,

    pub transcript_requests: Mutex<Vec<Value>>,
    pub pending_polls: Mutex<u32>,
    pub polls: Mutex<u32>,
    pub transcript_outcome: Mutex<TranscriptOutcome>,

    pub vimeo_authorized: Mutex<bool>,
    pub omit_player_url: Mutex<bool>,
    pub vimeo_created: Mutex<Vec<Value>>,
    pub tus_uploads: Mutex<Vec<Vec<u8>>>,

    pub airtable_reject: Mutex<Option<u16>>,
    pub airtable_created: Mutex<Vec<(String, Value)>>,
    pub airtable_formulas: Mutex<Vec<String>>,
}

impl MockState {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            transcript_requests: Mutex::new(Vec::new()),
            pending_polls: Mutex::new(0),
            polls: Mutex::new(0),
            transcript_outcome: Mutex::new(TranscriptOutcome::Completed),
            vimeo_authorized: Mutex::new(true),
            omit_player_url: Mutex::new(false),
            vimeo_created: Mutex::new(Vec::new()),
            tus_uploads: Mutex::new(Vec::new()),
            airtable_reject: Mutex::new(None),
            airtable_created: Mutex::new(Vec::new()),
            airtable_formulas: Mutex::new(Vec::new()),
        }
    }

    /// Settings pointing every collaborator at this server.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.assembly_ai.api_key = ASSEMBLY_AI_KEY.to_string();
        settings.assembly_ai.api_url = self.base_url.clone();
        settings.airtable.api_key = AIRTABLE_KEY.to_string();
        settings.airtable.base_id = AIRTABLE_BASE.to_string();
        settings.airtable.api_url = self.base_url.clone();
        settings.vimeo.access_token = VIMEO_TOKEN.to_string();
        settings.vimeo.folder_id = Some(VIMEO_FOLDER.to_string());
        settings.vimeo.api_url = self.base_url.clone();
        settings.evaluation.poll_interval_ms = 5;
        settings.evaluation.max_attempts = 5;
        settings
    }
}

pub async fn spawn() -> Arc<MockState> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(MockState::new(format!("http://{addr}")));

    let app = Router::new()
        .route("/v2/transcript", post(create_transcript))
        .route("/v2/transcript/{id}", get(get_transcript))
        .route("/me", get(vimeo_me))
        .route("/me/videos", post(create_video))
        .route("/tus/{id}", patch(tus_patch))
        .route("/videos/{id}", get(video_details))
        .route("/v0/{base}/{table}", get(list_records).post(create_records))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    state
}

/// The reference analysis: scores 84 / 85 / 90.
pub fn completed_transcript(id: &str) -> Value {
    json!({
        "id": id,
        "status": "completed",
        "text": "I like to paint on weekends.",
        "confidence": 0.9,
        "words": [
            { "text": "I", "confidence": 0.98, "start": 250, "end": 400 },
            { "text": "like", "confidence": 0.95, "start": 420, "end": 700 }
        ],
        "language_code": "en_us",
        "audio_duration": 60.0,
        "speech_duration": 54.0,
        "pause_count": 2,
        "acoustic_analysis": {
            "speech_rate": 150.0,
            "pronunciation_score": 85.0,
            "clarity_score": 90.0
        }
    })
}

fn header_is(headers: &HeaderMap, name: &str, expected: &str) -> bool {
    headers.get(name).and_then(|v| v.to_str().ok()) == Some(expected)
}

async fn create_transcript(
    State(mock): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !header_is(&headers, "authorization", ASSEMBLY_AI_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication error, API token missing/invalid" })),
        )
            .into_response();
    }
    mock.transcript_requests.lock().push(body);
    Json(json!({ "id": "tr_test", "status": "queued" })).into_response()
}

async fn get_transcript(State(mock): State<Arc<MockState>>, Path(id): Path<String>) -> Json<Value> {
    *mock.polls.lock() += 1;
    {
        let mut pending = mock.pending_polls.lock();
        if *pending > 0 {
            *pending -= 1;
            return Json(json!({ "id": id, "status": "processing" }));
        }
    }

    let outcome = *mock.transcript_outcome.lock();
    match outcome {
        TranscriptOutcome::Completed => Json(completed_transcript(&id)),
        TranscriptOutcome::Error => Json(json!({
            "id": id,
            "status": "error",
            "error": "Audio file could not be decoded"
        })),
        TranscriptOutcome::Stalled => Json(json!({ "id": id, "status": "processing" })),
    }
}

async fn vimeo_me(State(mock): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let bearer = format!("Bearer {VIMEO_TOKEN}");
    if *mock.vimeo_authorized.lock() && header_is(&headers, "authorization", &bearer) {
        Json(json!({ "uri": "/users/1", "name": "Test Account" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
    }
}

async fn create_video(State(mock): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    mock.vimeo_created.lock().push(body);
    Json(json!({
        "uri": format!("/videos/{VIDEO_ID}"),
        "upload": {
            "approach": "tus",
            "upload_link": format!("{}/tus/{VIDEO_ID}", mock.base_url)
        }
    }))
}

async fn tus_patch(State(mock): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    if !header_is(&headers, "tus-resumable", "1.0.0") {
        return StatusCode::PRECONDITION_FAILED.into_response();
    }
    let len = body.len();
    mock.tus_uploads.lock().push(body.to_vec());
    (StatusCode::NO_CONTENT, [("Upload-Offset", len.to_string())]).into_response()
}

async fn video_details(State(mock): State<Arc<MockState>>, Path(id): Path<String>) -> Json<Value> {
    if *mock.omit_player_url.lock() {
        Json(json!({ "uri": format!("/videos/{id}") }))
    } else {
        Json(json!({ "player_embed_url": format!("https://player.vimeo.com/video/{id}") }))
    }
}

async fn create_records(
    State(mock): State<Arc<MockState>>,
    Path((_base, table)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !header_is(&headers, "authorization", &format!("Bearer {AIRTABLE_KEY}")) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "AUTHENTICATION_REQUIRED" }))).into_response();
    }
    if let Some(status) = *mock.airtable_reject.lock() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
        return (
            status,
            Json(json!({
                "error": {
                    "type": "INVALID_VALUE_FOR_COLUMN",
                    "message": "Field \"StudentID\" cannot accept the provided value"
                }
            })),
        )
            .into_response();
    }

    let fields = body["records"][0]["fields"].clone();
    mock.airtable_created.lock().push((table, body));
    Json(json!({ "records": [{ "id": CREATED_RECORD, "fields": fields }] })).into_response()
}

async fn list_records(
    State(mock): State<Arc<MockState>>,
    Path((_base, table)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let formula = params.get("filterByFormula").cloned().unwrap_or_default();
    mock.airtable_formulas.lock().push(formula.clone());

    if table == "Participants" && formula == format!("{{StudentID}} = '{KNOWN_STUDENT}'") {
        Json(json!({
            "records": [{
                "id": "recSTUDENT1",
                "fields": { "StudentID": KNOWN_STUDENT, "First Name": "Alice" }
            }]
        }))
    } else {
        Json(json!({ "records": [] }))
    }
}
