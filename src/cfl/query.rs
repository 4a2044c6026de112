//! # Query Compiler
//!
//! Turns a structured [`SearchFilter`] into a single CQL string, or passes a raw
//! CQL query through untouched.
//!
//! ## Clause Order
//!
//! Clauses are always emitted in the same order, regardless of how the filter was
//! built:
//!
//! ```text
//! text ~ "..." AND space = "..." AND type = "..." AND title ~ "..." AND label = "..."
//! ```
//!
//! Keeping the order fixed makes the compiled output deterministic, which in turn
//! keeps it easy to test and easy to read in `--verbose` logs.
//!
//! ## Raw Queries
//!
//! `--cql` is a power-user escape hatch. When present it is returned verbatim: no
//! quoting, no validation, and no combination with the other filter fields.
//!
//! ## Quoting
//!
//! Literal values are wrapped in double quotes. Embedded double quotes are *not*
//! escaped; a value containing `"` produces CQL the backend will reject. Users who
//! need such values can write the query themselves with `--cql`.

use crate::error::{CflError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The content types CQL's `type` field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Page,
    Blogpost,
    Attachment,
    Comment,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Page,
        ContentType::Blogpost,
        ContentType::Attachment,
        ContentType::Comment,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ContentType::Page => "page",
            ContentType::Blogpost => "blogpost",
            ContentType::Attachment => "attachment",
            ContentType::Comment => "comment",
        }
    }

    /// Comma separated list of accepted names, for error messages.
    pub fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = CflError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CflError::validation(format!(
                    "invalid content type '{}' (allowed: {})",
                    s,
                    Self::allowed()
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// CQL `~`, a fuzzy "contains" match.
    Contains,
    Equals,
}

impl Operator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Contains => "~",
            Operator::Equals => "=",
        }
    }
}

/// One `field op "value"` term of a compiled query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: &'static str,
    pub operator: Operator,
    pub value: String,
}

impl Clause {
    fn new(field: &'static str, operator: Operator, value: &str) -> Self {
        Self {
            field,
            operator,
            value: value.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("{} {} \"{}\"", self.field, self.operator.as_str(), self.value)
    }
}

/// User-facing search filters, as collected from the command line.
///
/// Empty strings are treated the same as `None`. `limit` is carried here so the
/// compiler can reject negative values before anything reaches the network; a
/// limit of zero is the caller's cue to skip the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub free_text: Option<String>,
    pub raw_query: Option<String>,
    pub space: Option<String>,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub label: Option<String>,
    pub limit: i64,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl SearchFilter {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    pub fn with_raw_query(mut self, cql: impl Into<String>) -> Self {
        self.raw_query = Some(cql.into());
        self
    }

    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// True when there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        [
            &self.raw_query,
            &self.free_text,
            &self.space,
            &self.content_type,
            &self.title,
            &self.label,
        ]
        .into_iter()
        .all(|f| present(f).is_none())
    }

    /// Builds the ordered clause list. Does not look at `raw_query`.
    pub fn clauses(&self) -> Result<Vec<Clause>> {
        let mut clauses = Vec::new();

        if let Some(text) = present(&self.free_text) {
            clauses.push(Clause::new("text", Operator::Contains, text));
        }
        if let Some(space) = present(&self.space) {
            clauses.push(Clause::new("space", Operator::Equals, space));
        }
        if let Some(raw_type) = present(&self.content_type) {
            let content_type: ContentType = raw_type.parse()?;
            clauses.push(Clause::new("type", Operator::Equals, content_type.as_str()));
        }
        if let Some(title) = present(&self.title) {
            clauses.push(Clause::new("title", Operator::Contains, title));
        }
        if let Some(label) = present(&self.label) {
            clauses.push(Clause::new("label", Operator::Equals, label));
        }

        Ok(clauses)
    }
}

/// Compiles a filter into exactly one CQL string.
///
/// Fails with a validation error for a negative limit, an unknown content type,
/// or a filter with nothing to search for.
pub fn compile(filter: &SearchFilter) -> Result<String> {
    if filter.limit < 0 {
        return Err(CflError::validation(format!(
            "limit must not be negative (got {})",
            filter.limit
        )));
    }

    if let Some(raw) = present(&filter.raw_query) {
        debug!("using raw CQL: {}", raw);
        return Ok(raw.to_string());
    }

    let clauses = filter.clauses()?;
    if clauses.is_empty() {
        return Err(CflError::validation(
            "nothing to search for: provide search text, --cql, or at least one of --space, --type, --title, --label",
        ));
    }

    let cql = clauses
        .iter()
        .map(Clause::render)
        .collect::<Vec<_>>()
        .join(" AND ");
    debug!("compiled CQL: {}", cql);
    Ok(cql)
}
