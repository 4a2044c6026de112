use thiserror::Error;

#[derive(Error, Debug)]
pub enum CflError {
    /// Caller-correctable input problems. Always surfaced before any request is sent.
    #[error("{0}")]
    Validation(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CflError>,
    },

    #[error("Confluence returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(#[from] minijinja::Error),
}

impl CflError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CflError::Validation(msg.into())
    }

    /// Wraps the error with the operation that produced it ("search failed: ...").
    ///
    /// Validation errors are returned unchanged so the user sees the actionable
    /// message verbatim.
    pub fn context(self, op: &str) -> Self {
        match self {
            CflError::Validation(_) => self,
            other => CflError::Context {
                context: format!("{} failed", op),
                source: Box::new(other),
            },
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CflError::Validation(_))
    }

    /// True for local lookups that came up empty and for upstream 404s.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CflError::NotFound(_) | CflError::Upstream { status: 404, .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CflError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_upstream_errors() {
        let err = CflError::Upstream {
            status: 401,
            message: "Unauthorized".into(),
        }
        .context("search");
        assert_eq!(
            err.to_string(),
            "search failed: Confluence returned 401: Unauthorized"
        );
    }

    #[test]
    fn not_found_covers_upstream_404() {
        assert!(CflError::NotFound("attachment".into()).is_not_found());
        assert!(CflError::Upstream {
            status: 404,
            message: "gone".into()
        }
        .is_not_found());
        assert!(!CflError::Upstream {
            status: 500,
            message: "boom".into()
        }
        .is_not_found());
    }

    #[test]
    fn context_leaves_validation_errors_alone() {
        let err = CflError::validation("limit must not be negative").context("search");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "limit must not be negative");
    }
}
