use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use speakcheck_config::VimeoSettings;
use tracing::debug;

use super::{UploadError, UploadedVideo, VideoHost, VideoMetadata};

const ACCEPT_V3: &str = "application/vnd.vimeo.*+json;version=3.4";

#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    uri: Option<String>,
    upload: Option<UploadTicket>,
}

#[derive(Debug, Deserialize)]
struct UploadTicket {
    upload_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    player_embed_url: Option<String>,
}

/// Vimeo API client using the tus upload approach.
pub struct VimeoClient {
    access_token: String,
    api_url: String,
    client: reqwest::Client,
}

impl VimeoClient {
    pub fn new(settings: &VimeoSettings) -> Self {
        Self {
            access_token: settings.access_token.clone(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn auth_failure(status: StatusCode) -> Option<UploadError> {
        matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
            .then(|| UploadError::Authentication(format!("HTTP {status}")))
    }

    async fn create_video(&self, size: usize, metadata: &VideoMetadata) -> Result<(String, String), UploadError> {
        let mut body = serde_json::json!({
            "upload": { "approach": "tus", "size": size },
            "name": metadata.name,
            "description": metadata.description,
            "privacy": { "view": metadata.privacy },
        });
        if let Some(folder_uri) = &metadata.folder_uri {
            body["folder_uri"] = serde_json::Value::String(folder_uri.clone());
        }

        let resp = self
            .client
            .post(self.url("/me/videos"))
            .bearer_auth(&self.access_token)
            .header("Accept", ACCEPT_V3)
            .json(&body)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if let Some(err) = Self::auth_failure(resp.status()) {
            return Err(err);
        }
        if !resp.status().is_success() {
            return Err(UploadError::Transport(format!("create video: HTTP {}", resp.status())));
        }

        let created: CreateVideoResponse = resp
            .json()
            .await
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;
        let uri = created
            .uri
            .ok_or_else(|| UploadError::MalformedResponse("video uri missing".to_string()))?;
        let upload_link = created
            .upload
            .and_then(|u| u.upload_link)
            .ok_or_else(|| UploadError::MalformedResponse("upload link missing".to_string()))?;
        Ok((uri, upload_link))
    }

    async fn send_bytes(&self, upload_link: &str, clip: &[u8]) -> Result<(), UploadError> {
        let resp = self
            .client
            .patch(upload_link)
            .header("Tus-Resumable", "1.0.0")
            .header("Upload-Offset", "0")
            .header("Content-Type", "application/offset+octet-stream")
            .body(clip.to_vec())
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(UploadError::Transport(format!("tus patch: HTTP {}", resp.status())));
        }
        Ok(())
    }

    async fn player_url(&self, uri: &str) -> Result<String, UploadError> {
        let details: VideoDetails = self
            .client
            .get(self.url(uri))
            .bearer_auth(&self.access_token)
            .header("Accept", ACCEPT_V3)
            .query(&[("fields", "player_embed_url")])
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| UploadError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        details
            .player_embed_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| UploadError::MalformedResponse("player_embed_url missing".to_string()))
    }
}

#[async_trait]
impl VideoHost for VimeoClient {
    async fn verify_identity(&self) -> Result<(), UploadError> {
        let resp = self
            .client
            .get(self.url("/me"))
            .bearer_auth(&self.access_token)
            .header("Accept", ACCEPT_V3)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(UploadError::Authentication(format!("HTTP {}", resp.status())))
        }
    }

    async fn upload(&self, clip: &[u8], metadata: &VideoMetadata) -> Result<UploadedVideo, UploadError> {
        let (uri, upload_link) = self.create_video(clip.len(), metadata).await?;
        debug!(%uri, bytes = clip.len(), "Vimeo upload ticket created");

        self.send_bytes(&upload_link, clip).await?;
        let playable_url = self.player_url(&uri).await?;

        let external_id = uri.rsplit('/').next().unwrap_or_default().to_string();
        Ok(UploadedVideo {
            playable_url,
            external_id,
        })
    }
}
