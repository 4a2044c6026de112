//! One page of list results, with a uniform "has more" signal.
//!
//! Confluence endpoints disagree on how they say "there is more": the v2 list
//! endpoints return a `_links.next` cursor, while the search endpoint reports a
//! `totalSize`. [`ResultPage`] keeps whichever signal the response carried and
//! answers [`ResultPage::has_more`] the same way for both.
//!
//! Pages are never walked automatically. The CLI shows a single page per
//! invocation and tells the user to raise `--limit` when more is available.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPage<T> {
    items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_size: Option<u64>,
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> ResultPage<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            total_size: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Blank cursors are treated as absent.
    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.next_cursor = cursor.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total_size = total;
        self
    }

    /// True when the backend signalled results beyond this page.
    ///
    /// Either a continuation cursor was present, or a known total exceeds the
    /// number of items returned. With neither signal the page is assumed complete.
    pub fn has_more(&self) -> bool {
        if self.next_cursor.is_some() {
            return true;
        }
        match self.total_size {
            Some(total) => total > self.items.len() as u64,
            None => false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Transforms the items while keeping the pagination signals.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> ResultPage<U> {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            total_size: self.total_size,
        }
    }
}
