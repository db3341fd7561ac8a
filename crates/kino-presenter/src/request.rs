//! Playback initiation requests

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single playback attempt, consumed by `StreamPresenter::initialize_stream`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRequest {
    /// Source media URL; missing or empty aborts initialization
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<PlaybackMetadata>,
}

impl PlaybackRequest {
    pub fn new(stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: Some(stream_url.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: PlaybackMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Descriptive data about the media being played
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Poster image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlaybackMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}
