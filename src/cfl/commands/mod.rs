use crate::config::CflConfig;
use crate::model::{Attachment, Page, SavedFile, SearchHit, Space};
use crate::pagination::ResultPage;
use std::path::PathBuf;

pub mod attachments;
pub mod config;
pub mod helpers;
pub mod init;
pub mod pages;
pub mod search;
pub mod spaces;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Everything a command hands back to its caller.
///
/// Listing commands fill exactly one of the `ResultPage` fields, keeping the
/// pagination signal intact for the renderer. Mutating commands report what they
/// touched in the `affected_*` fields.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub hits: Option<ResultPage<SearchHit>>,
    pub spaces: Option<ResultPage<Space>>,
    pub pages: Option<ResultPage<Page>>,
    pub attachments: Option<ResultPage<Attachment>>,
    pub affected_pages: Vec<Page>,
    pub affected_attachments: Vec<Attachment>,
    pub saved_files: Vec<SavedFile>,
    pub config: Option<CflConfig>,
    pub config_path: Option<PathBuf>,
    pub value: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_hits(mut self, hits: ResultPage<SearchHit>) -> Self {
        self.hits = Some(hits);
        self
    }

    pub fn with_spaces(mut self, spaces: ResultPage<Space>) -> Self {
        self.spaces = Some(spaces);
        self
    }

    pub fn with_pages(mut self, pages: ResultPage<Page>) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_attachments(mut self, attachments: ResultPage<Attachment>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    pub fn with_affected_pages(mut self, pages: Vec<Page>) -> Self {
        self.affected_pages = pages;
        self
    }

    pub fn with_affected_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.affected_attachments = attachments;
        self
    }

    pub fn with_saved_files(mut self, files: Vec<SavedFile>) -> Self {
        self.saved_files = files;
        self
    }

    pub fn with_config(mut self, config: CflConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    /// Whether the listing carried in this result has more results upstream.
    pub fn has_more(&self) -> bool {
        self.hits.as_ref().is_some_and(|p| p.has_more())
            || self.spaces.as_ref().is_some_and(|p| p.has_more())
            || self.pages.as_ref().is_some_and(|p| p.has_more())
            || self.attachments.as_ref().is_some_and(|p| p.has_more())
    }
}
