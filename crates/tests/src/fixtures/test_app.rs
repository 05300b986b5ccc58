use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use speakcheck_api::{build_router, state::AppState};
use tokio::net::TcpListener;

use super::mock_services::{self, MockState};

/// The real router on an ephemeral port, backed by mock collaborators.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub mock: Arc<MockState>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mock = mock_services::spawn().await;
        let app = build_router(AppState::new(mock.settings()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            mock,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}
