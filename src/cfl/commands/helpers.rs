use crate::error::{CflError, Result};

/// Largest page size the v2 list endpoints accept.
pub const MAX_LIMIT: u32 = 250;

/// Checks a user supplied `--limit`.
///
/// Negative values are rejected. Zero returns `None`, meaning the caller should
/// skip the request and report an empty page. Anything above the backend's cap is
/// clamped.
pub fn page_limit(limit: i64) -> Result<Option<u32>> {
    if limit < 0 {
        return Err(CflError::validation(format!(
            "limit must not be negative (got {})",
            limit
        )));
    }
    if limit == 0 {
        return Ok(None);
    }
    Ok(Some(limit.min(MAX_LIMIT as i64) as u32))
}

/// Picks the explicit space key, falling back to the configured default.
pub fn resolve_space_key(explicit: Option<&str>, default: Option<&str>) -> Result<String> {
    explicit
        .filter(|k| !k.is_empty())
        .or(default.filter(|k| !k.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            CflError::validation(
                "no space given: pass --space or set a default with `cfl config set default-space KEY`",
            )
        })
}

/// Rejects blank identifiers before they turn into odd URLs.
pub fn require_id<'a>(what: &str, id: &'a str) -> Result<&'a str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CflError::validation(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_limit() {
        assert!(page_limit(-1).is_err());
        assert_eq!(page_limit(0).unwrap(), None);
        assert_eq!(page_limit(25).unwrap(), Some(25));
        assert_eq!(page_limit(10_000).unwrap(), Some(MAX_LIMIT));
    }

    #[test]
    fn test_resolve_space_key() {
        assert_eq!(resolve_space_key(Some("DEV"), Some("OPS")).unwrap(), "DEV");
        assert_eq!(resolve_space_key(None, Some("OPS")).unwrap(), "OPS");
        assert_eq!(resolve_space_key(Some(""), Some("OPS")).unwrap(), "OPS");
        assert!(resolve_space_key(None, None).is_err());
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("page id", " 123 ").unwrap(), "123");
        assert!(require_id("page id", "  ").is_err());
    }
}
