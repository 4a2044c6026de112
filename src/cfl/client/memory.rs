use super::ConfluenceApi;
use crate::error::{CflError, Result};
use crate::model::{
    Attachment, NewPage, Page, PageBody, PageUpdate, SearchHit, Space, StorageBody, Version,
};
use crate::pagination::ResultPage;
use std::cell::RefCell;
use std::path::Path;

/// In-memory stand-in for Confluence.
///
/// Pages, spaces and attachments live in plain vectors. Every trait call is
/// appended to [`MemoryClient::calls`] so tests can check which requests a command
/// made, and in which order.
#[derive(Debug, Default)]
pub struct MemoryClient {
    state: RefCell<State>,
    calls: RefCell<Vec<String>>,
}

#[derive(Debug, Default)]
struct State {
    spaces: Vec<Space>,
    pages: Vec<Page>,
    attachments: Vec<Attachment>,
    search_hits: Vec<SearchHit>,
    search_total: Option<u64>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, 1000 + self.next_id)
    }
}

/// Truncates to `limit` and sets a cursor when anything was left behind, the
/// way the v2 list endpoints behave.
fn paginate<T: Clone>(items: Vec<T>, limit: u32, path: &str) -> ResultPage<T> {
    let limit = limit as usize;
    let more = items.len() > limit;
    let page: Vec<T> = items.into_iter().take(limit).collect();
    let cursor = more.then(|| format!("{}?cursor=next", path));
    ResultPage::new(page).with_cursor(cursor)
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_space(self, id: &str, key: &str, name: &str) -> Self {
        self.state.borrow_mut().spaces.push(Space {
            id: id.to_string(),
            key: key.to_string(),
            name: name.to_string(),
            space_type: "global".to_string(),
            status: "current".to_string(),
        });
        self
    }

    pub fn with_page(self, id: &str, space_id: &str, title: &str, body: &str) -> Self {
        self.state.borrow_mut().pages.push(Page {
            id: id.to_string(),
            title: title.to_string(),
            space_id: space_id.to_string(),
            status: "current".to_string(),
            parent_id: None,
            version: Some(Version {
                number: 1,
                created_at: None,
                message: None,
            }),
            body: Some(PageBody {
                storage: Some(StorageBody::new(body)),
            }),
        });
        self
    }

    pub fn with_attachment(self, id: &str, page_id: &str, filename: &str) -> Self {
        self.state.borrow_mut().attachments.push(Attachment {
            id: id.to_string(),
            title: filename.to_string(),
            media_type: "application/octet-stream".to_string(),
            file_size: filename.len() as u64,
            download_link: Some(format!("/download/attachments/{}/{}", page_id, filename)),
            page_id: Some(page_id.to_string()),
        });
        self
    }

    /// Canned search results; `total` mimics the search endpoint's `totalSize`.
    pub fn with_search_hits(self, hits: Vec<SearchHit>, total: Option<u64>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.search_hits = hits;
            state.search_total = total;
        }
        self
    }

    /// Every call made so far, as `"operation:argument"` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn page(&self, id: &str) -> Option<Page> {
        self.state.borrow().pages.iter().find(|p| p.id == id).cloned()
    }

    pub fn attachment_ids(&self) -> Vec<String> {
        self.state
            .borrow()
            .attachments
            .iter()
            .map(|a| a.id.clone())
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn not_found(what: &str, id: &str) -> CflError {
    CflError::Upstream {
        status: 404,
        message: format!("{} {} not found", what, id),
    }
}

impl ConfluenceApi for MemoryClient {
    fn search(&self, cql: &str, limit: u32) -> Result<ResultPage<SearchHit>> {
        self.record(format!("search:{}", cql));
        let state = self.state.borrow();
        let hits: Vec<SearchHit> = state
            .search_hits
            .iter()
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(ResultPage::new(hits).with_total(state.search_total))
    }

    fn list_spaces(&self, limit: u32) -> Result<ResultPage<Space>> {
        self.record(format!("list_spaces:{}", limit));
        let spaces = self.state.borrow().spaces.clone();
        Ok(paginate(spaces, limit, "/wiki/api/v2/spaces"))
    }

    fn get_space(&self, key: &str) -> Result<Space> {
        self.record(format!("get_space:{}", key));
        self.state
            .borrow()
            .spaces
            .iter()
            .find(|s| s.key == key)
            .cloned()
            .ok_or_else(|| CflError::NotFound(format!("space '{}'", key)))
    }

    fn list_pages(&self, space_id: &str, limit: u32) -> Result<ResultPage<Page>> {
        self.record(format!("list_pages:{}", space_id));
        let pages: Vec<Page> = self
            .state
            .borrow()
            .pages
            .iter()
            .filter(|p| p.space_id == space_id)
            .cloned()
            .collect();
        Ok(paginate(pages, limit, "/wiki/api/v2/pages"))
    }

    fn get_page(&self, id: &str) -> Result<Page> {
        self.record(format!("get_page:{}", id));
        self.page(id).ok_or_else(|| not_found("page", id))
    }

    fn create_page(&self, page: &NewPage) -> Result<Page> {
        self.record(format!("create_page:{}", page.title));
        let mut state = self.state.borrow_mut();
        let created = Page {
            id: state.next_id(""),
            title: page.title.clone(),
            space_id: page.space_id.clone(),
            status: "current".to_string(),
            parent_id: page.parent_id.clone(),
            version: Some(Version {
                number: 1,
                created_at: None,
                message: None,
            }),
            body: Some(PageBody {
                storage: Some(StorageBody::new(page.body.clone())),
            }),
        };
        state.pages.push(created.clone());
        Ok(created)
    }

    fn update_page(&self, update: &PageUpdate) -> Result<Page> {
        self.record(format!("update_page:{}", update.id));
        let mut state = self.state.borrow_mut();
        let page = state
            .pages
            .iter_mut()
            .find(|p| p.id == update.id)
            .ok_or_else(|| not_found("page", &update.id))?;

        if update.version != page.version_number() + 1 {
            return Err(CflError::Upstream {
                status: 409,
                message: "Version must be incremented on update".into(),
            });
        }
        page.title = update.title.clone();
        page.body = Some(PageBody {
            storage: Some(StorageBody::new(update.body.clone())),
        });
        page.version = Some(Version {
            number: update.version,
            created_at: None,
            message: None,
        });
        Ok(page.clone())
    }

    fn delete_page(&self, id: &str) -> Result<()> {
        self.record(format!("delete_page:{}", id));
        let mut state = self.state.borrow_mut();
        let before = state.pages.len();
        state.pages.retain(|p| p.id != id);
        if state.pages.len() == before {
            return Err(not_found("page", id));
        }
        Ok(())
    }

    fn list_attachments(&self, page_id: &str, limit: u32) -> Result<ResultPage<Attachment>> {
        self.record(format!("list_attachments:{}", page_id));
        let attachments: Vec<Attachment> = self
            .state
            .borrow()
            .attachments
            .iter()
            .filter(|a| a.page_id.as_deref() == Some(page_id))
            .cloned()
            .collect();
        Ok(paginate(attachments, limit, "/wiki/api/v2/attachments"))
    }

    fn get_attachment(&self, id: &str) -> Result<Attachment> {
        self.record(format!("get_attachment:{}", id));
        self.state
            .borrow()
            .attachments
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| not_found("attachment", id))
    }

    fn upload_attachment(&self, page_id: &str, file: &Path) -> Result<Attachment> {
        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.record(format!("upload_attachment:{}", filename));

        let bytes = std::fs::read(file)?;
        let mut state = self.state.borrow_mut();
        let attachment = Attachment {
            id: state.next_id("att"),
            title: filename.clone(),
            media_type: "application/octet-stream".to_string(),
            file_size: bytes.len() as u64,
            download_link: Some(format!("/download/attachments/{}/{}", page_id, filename)),
            page_id: Some(page_id.to_string()),
        };
        state.attachments.push(attachment.clone());
        Ok(attachment)
    }

    fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        self.record(format!("download_attachment:{}", attachment.id));
        Ok(format!("contents of {}", attachment.title).into_bytes())
    }

    fn delete_attachment(&self, id: &str) -> Result<()> {
        self.record(format!("delete_attachment:{}", id));
        let mut state = self.state.borrow_mut();
        let before = state.attachments.len();
        state.attachments.retain(|a| a.id != id);
        if state.attachments.len() == before {
            return Err(not_found("attachment", id));
        }
        Ok(())
    }
}
