//! # Transport Layer
//!
//! The [`ConfluenceApi`] trait is the seam between command logic and the network.
//! Commands only ever see this trait, which keeps them testable without a server.
//!
//! ## Implementations
//!
//! - [`http::HttpClient`]: Production client over the Confluence REST API
//!   - Blocking `reqwest` client, one request at a time
//!   - HTTP basic auth with the configured email and API token
//!   - v2 endpoints for spaces, pages and attachments; v1 for search and uploads
//!
//! - [`memory::MemoryClient`]: In-memory backend for tests
//!   - Serves canned spaces, pages and attachments
//!   - Records every call so tests can assert what was (not) requested
//!
//! ## Pagination
//!
//! List operations return a [`ResultPage`] carrying whatever signal the endpoint
//! provided (`_links.next` cursor, `totalSize` counter). The transport never
//! follows a cursor on its own.

use crate::error::Result;
use crate::model::{Attachment, NewPage, Page, PageUpdate, SearchHit, Space};
use crate::pagination::ResultPage;
use std::path::Path;

pub mod http;
pub mod memory;

pub trait ConfluenceApi {
    /// Run a CQL search
    fn search(&self, cql: &str, limit: u32) -> Result<ResultPage<SearchHit>>;

    fn list_spaces(&self, limit: u32) -> Result<ResultPage<Space>>;

    /// Look up a space by its key (e.g. `DEV`)
    fn get_space(&self, key: &str) -> Result<Space>;

    fn list_pages(&self, space_id: &str, limit: u32) -> Result<ResultPage<Page>>;

    /// Fetch a page including its storage-format body
    fn get_page(&self, id: &str) -> Result<Page>;

    fn create_page(&self, page: &NewPage) -> Result<Page>;

    fn update_page(&self, update: &PageUpdate) -> Result<Page>;

    fn delete_page(&self, id: &str) -> Result<()>;

    fn list_attachments(&self, page_id: &str, limit: u32) -> Result<ResultPage<Attachment>>;

    fn get_attachment(&self, id: &str) -> Result<Attachment>;

    fn upload_attachment(&self, page_id: &str, file: &Path) -> Result<Attachment>;

    fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>>;

    fn delete_attachment(&self, id: &str) -> Result<()>;
}
