//! Per-URL response documents printed by the CLI.
use backstage_common::BackstageError;
use backstage_social::youtube::NormalizedPost;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Data {
    Post(NormalizedPost),
    Posts(Vec<NormalizedPost>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub status: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Envelope {
    pub fn success(url: impl Into<String>, data: Data) -> Self {
        Self {
            status: true,
            url: url.into(),
            data: Some(data),
            error: None,
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    /// Only the caller-safe message of `err` is kept.
    pub fn failure(url: impl Into<String>, err: &BackstageError) -> Self {
        Self {
            status: false,
            url: url.into(),
            data: None,
            error: Some(err.public_message().to_string()),
            timestamp: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status
    }
}
