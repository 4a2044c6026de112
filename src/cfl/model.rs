//! Records exchanged with Confluence.
//!
//! Field names follow the v2 REST API (camelCase on the wire), so most of these
//! deserialize straight from responses. They also serialize back out for
//! `--output json`.

use crate::references::Named;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub space_type: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBody {
    pub value: String,
    #[serde(default = "storage_representation")]
    pub representation: String,
}

fn storage_representation() -> String {
    "storage".to_string()
}

impl StorageBody {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            representation: storage_representation(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub space_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PageBody>,
}

impl Page {
    /// The storage-format markup, or an empty string when the body was not requested.
    pub fn storage(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map(|s| s.value.as_str())
            .unwrap_or("")
    }

    pub fn version_number(&self) -> u32 {
        self.version.as_ref().map(|v| v.number).unwrap_or(0)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.version.as_ref().and_then(|v| v.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    /// The display filename.
    pub title: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

impl Named for Attachment {
    fn file_name(&self) -> &str {
        &self.title
    }
}

/// One row of a CQL search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub content_type: String,
    pub title: String,
    pub space: Option<String>,
    pub excerpt: String,
    pub url: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Input for creating a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub space_id: String,
    pub title: String,
    pub body: String,
    pub parent_id: Option<String>,
}

/// Input for editing a page. The caller resolves the next version number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUpdate {
    pub id: String,
    pub title: String,
    pub body: String,
    pub version: u32,
}

/// Result of a download: where the bytes went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: usize,
}
