//! # API Facade
//!
//! The single entry point for remote operations, whatever UI sits on top.
//!
//! `CflApi<C: ConfluenceApi>` dispatches to the command layer and returns
//! structured [`CmdResult`]s. It holds no business logic and does no I/O of its
//! own beyond what the client does:
//!
//! - Production: `CflApi<HttpClient>`
//! - Testing: `CflApi<MemoryClient>`
//!
//! Configuration commands do not need a backend connection (they are how one gets
//! configured in the first place), so [`config`] and [`init`] are free functions
//! over the config directory.

use crate::client::ConfluenceApi;
use crate::commands;
use crate::config::CflConfig;
use crate::error::Result;
use crate::query::SearchFilter;
use std::path::{Path, PathBuf};

pub struct CflApi<C: ConfluenceApi> {
    client: C,
    default_space: Option<String>,
}

impl<C: ConfluenceApi> CflApi<C> {
    pub fn new(client: C, default_space: Option<String>) -> Self {
        Self {
            client,
            default_space,
        }
    }

    pub fn search(&self, filter: &SearchFilter) -> Result<CmdResult> {
        commands::search::run(&self.client, filter)
    }

    pub fn list_spaces(&self, limit: i64) -> Result<CmdResult> {
        commands::spaces::list(&self.client, limit)
    }

    pub fn view_space(&self, key: &str) -> Result<CmdResult> {
        commands::spaces::view(&self.client, key)
    }

    pub fn list_pages(&self, space: Option<&str>, limit: i64) -> Result<CmdResult> {
        commands::pages::list(&self.client, space, self.default_space(), limit)
    }

    pub fn view_page(&self, id: &str) -> Result<CmdResult> {
        commands::pages::view(&self.client, id)
    }

    pub fn create_page(
        &self,
        space: Option<&str>,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<CmdResult> {
        let space = commands::helpers::resolve_space_key(space, self.default_space())?;
        commands::pages::create(&self.client, &space, title, body, parent_id)
    }

    pub fn update_page(
        &self,
        id: &str,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<CmdResult> {
        commands::pages::update(&self.client, id, title, body)
    }

    pub fn delete_page(&self, id: &str) -> Result<CmdResult> {
        commands::pages::delete(&self.client, id)
    }

    pub fn list_attachments(
        &self,
        page_id: &str,
        limit: i64,
        unused_only: bool,
    ) -> Result<CmdResult> {
        commands::attachments::list(&self.client, page_id, limit, unused_only)
    }

    pub fn upload_attachments(&self, page_id: &str, files: &[PathBuf]) -> Result<CmdResult> {
        commands::attachments::upload(&self.client, page_id, files)
    }

    pub fn download_attachment(
        &self,
        page_id: &str,
        attachment: &str,
        out_dir: &Path,
    ) -> Result<CmdResult> {
        commands::attachments::download(&self.client, page_id, attachment, out_dir)
    }

    pub fn delete_attachment(&self, id: &str) -> Result<CmdResult> {
        commands::attachments::delete(&self.client, id)
    }

    pub fn default_space(&self) -> Option<&str> {
        self.default_space.as_deref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

pub fn config(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    commands::config::run(config_dir, action)
}

pub fn init(config_dir: &Path, config: CflConfig) -> Result<CmdResult> {
    commands::init::run(config_dir, config)
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryClient;

    fn api() -> CflApi<MemoryClient> {
        let client = MemoryClient::new()
            .with_space("10", "DEV", "Development")
            .with_page("100", "10", "Home", "<p>hi</p>")
            .with_attachment("att1", "100", "unused.png");
        CflApi::new(client, Some("DEV".into()))
    }

    #[test]
    fn list_pages_passes_default_space() {
        let api = api();
        api.list_pages(None, 10).unwrap();
        assert_eq!(api.client().calls()[0], "get_space:DEV");
    }

    #[test]
    fn create_page_uses_default_space() {
        let api = api();
        let result = api.create_page(None, "Title", "", None).unwrap();
        assert_eq!(result.affected_pages[0].space_id, "10");
    }

    #[test]
    fn search_dispatches_compiled_query() {
        let api = api();
        api.search(&SearchFilter::new(5).with_label("ops")).unwrap();
        assert_eq!(api.client().calls(), vec![r#"search:label = "ops""#]);
    }

    #[test]
    fn attachments_dispatch_unused_flag() {
        let api = api();
        let result = api.list_attachments("100", 10, true).unwrap();
        assert_eq!(result.attachments.unwrap().len(), 1);
        assert_eq!(api.client().calls().len(), 2);
    }
}
