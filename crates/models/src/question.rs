use serde::{Deserialize, Serialize};

/// Prompt category. Serialized as its number (1, 2, 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Category {
    Intro = 1,
    Free = 2,
    Media = 3,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Intro, Category::Free, Category::Media];
}

impl From<Category> for u8 {
    fn from(category: Category) -> Self {
        category as u8
    }
}

impl TryFrom<u8> for Category {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Category::Intro),
            2 => Ok(Category::Free),
            3 => Ok(Category::Media),
            other => Err(format!("unknown question category {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    /// Seconds the asset is shown before the countdown starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl MediaAsset {
    /// How long the preview holds before the countdown.
    ///
    /// Only videos are timed; images go straight to the countdown even when
    /// a duration is declared.
    pub fn view_duration(&self) -> Option<u32> {
        match self.kind {
            MediaKind::Video => self.duration.filter(|d| *d > 0),
            MediaKind::Image => None,
        }
    }
}

/// One assessment prompt. Immutable once authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category: Category,
    pub text: String,
    /// Countdown before recording, in seconds.
    pub preparation_time: u32,
    /// Maximum response length, in seconds.
    pub response_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaAsset>,
}

impl Question {
    pub fn view_duration(&self) -> Option<u32> {
        self.media.as_ref().and_then(MediaAsset::view_duration)
    }
}
