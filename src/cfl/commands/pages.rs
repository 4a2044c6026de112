use crate::client::ConfluenceApi;
use crate::commands::helpers::{page_limit, require_id, resolve_space_key};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CflError, Result};
use crate::model::{NewPage, PageUpdate};
use crate::pagination::ResultPage;
use log::debug;

/// Lists pages of a space. The space is the explicit key or the configured default.
pub fn list<C: ConfluenceApi>(
    client: &C,
    space: Option<&str>,
    default_space: Option<&str>,
    limit: i64,
) -> Result<CmdResult> {
    let key = resolve_space_key(space, default_space)?;
    let Some(limit) = page_limit(limit)? else {
        return Ok(CmdResult::default().with_pages(ResultPage::empty()));
    };

    let space = client
        .get_space(&key)
        .map_err(|e| e.context("listing pages"))?;
    let pages = client
        .list_pages(&space.id, limit)
        .map_err(|e| e.context("listing pages"))?;
    Ok(CmdResult::default().with_pages(pages))
}

pub fn view<C: ConfluenceApi>(client: &C, id: &str) -> Result<CmdResult> {
    let id = require_id("page id", id)?;
    let page = client.get_page(id).map_err(|e| e.context("fetching page"))?;
    Ok(CmdResult::default().with_pages(ResultPage::new(vec![page])))
}

pub fn create<C: ConfluenceApi>(
    client: &C,
    space_key: &str,
    title: &str,
    body: &str,
    parent_id: Option<&str>,
) -> Result<CmdResult> {
    if title.trim().is_empty() {
        return Err(CflError::validation("page title must not be empty"));
    }

    let space = client
        .get_space(space_key)
        .map_err(|e| e.context("creating page"))?;
    let page = client
        .create_page(&NewPage {
            space_id: space.id,
            title: title.trim().to_string(),
            body: body.to_string(),
            parent_id: parent_id.map(str::to_string),
        })
        .map_err(|e| e.context("creating page"))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created page {} ({}) in {}",
        page.title, page.id, space_key
    )));
    Ok(result.with_affected_pages(vec![page]))
}

/// Replaces the title and/or body of a page, bumping its version.
///
/// Whatever is not supplied is carried over from the current version.
pub fn update<C: ConfluenceApi>(
    client: &C,
    id: &str,
    title: Option<&str>,
    body: Option<&str>,
) -> Result<CmdResult> {
    let id = require_id("page id", id)?;
    if title.is_none() && body.is_none() {
        return Err(CflError::validation(
            "nothing to change: pass --title, --body, --file, or pipe content on stdin",
        ));
    }
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err(CflError::validation("page title must not be empty"));
    }

    let current = client.get_page(id).map_err(|e| e.context("updating page"))?;
    let next_version = current.version_number() + 1;
    debug!(
        "updating page {} from version {} to {}",
        id,
        current.version_number(),
        next_version
    );

    let page = client
        .update_page(&PageUpdate {
            id: id.to_string(),
            title: title
                .map(|t| t.trim().to_string())
                .unwrap_or_else(|| current.title.clone()),
            body: body
                .map(str::to_string)
                .unwrap_or_else(|| current.storage().to_string()),
            version: next_version,
        })
        .map_err(|e| e.context("updating page"))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated page {} to version {}",
        page.title,
        page.version_number()
    )));
    Ok(result.with_affected_pages(vec![page]))
}

pub fn delete<C: ConfluenceApi>(client: &C, id: &str) -> Result<CmdResult> {
    let id = require_id("page id", id)?;
    client
        .delete_page(id)
        .map_err(|e| e.context("deleting page"))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted page {}", id)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryClient;

    fn client() -> MemoryClient {
        MemoryClient::new()
            .with_space("10", "DEV", "Development")
            .with_page("100", "10", "Home", "<p>welcome</p>")
            .with_page("101", "10", "Runbook", "<p>steps</p>")
            .with_page("102", "10", "Oncall", "<p>rota</p>")
    }

    #[test]
    fn list_uses_default_space() {
        let client = client();
        let result = list(&client, None, Some("DEV"), 25).unwrap();
        assert_eq!(result.pages.unwrap().len(), 3);
        assert_eq!(
            client.calls(),
            vec!["get_space:DEV".to_string(), "list_pages:10".to_string()]
        );
    }

    #[test]
    fn list_without_any_space_fails_early() {
        let client = client();
        assert!(list(&client, None, None, 25).unwrap_err().is_validation());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn list_truncated_has_more() {
        let result = list(&client(), Some("DEV"), None, 2).unwrap();
        assert!(result.has_more());
    }

    #[test]
    fn view_returns_storage_body() {
        let result = view(&client(), "101").unwrap();
        assert_eq!(result.pages.unwrap().items()[0].storage(), "<p>steps</p>");
    }

    #[test]
    fn create_resolves_space_id() {
        let client = client();
        let result = create(&client, "DEV", "New page", "<p>x</p>", Some("100")).unwrap();
        let page = &result.affected_pages[0];
        assert_eq!(page.space_id, "10");
        assert_eq!(page.parent_id.as_deref(), Some("100"));
    }

    #[test]
    fn create_rejects_blank_title() {
        assert!(create(&client(), "DEV", "  ", "", None).is_err());
    }

    #[test]
    fn update_bumps_version_and_keeps_title() {
        let client = client();
        let result = update(&client, "101", None, Some("<p>new</p>")).unwrap();
        let page = &result.affected_pages[0];
        assert_eq!(page.title, "Runbook");
        assert_eq!(page.version_number(), 2);
        assert_eq!(client.page("101").unwrap().storage(), "<p>new</p>");
    }

    #[test]
    fn update_requires_a_change() {
        let client = client();
        assert!(update(&client, "101", None, None).is_err());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn delete_removes_page() {
        let client = client();
        delete(&client, "102").unwrap();
        assert!(client.page("102").is_none());
        assert!(delete(&client, "102").is_err());
    }
}
