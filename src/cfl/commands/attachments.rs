use crate::client::ConfluenceApi;
use crate::commands::helpers::{page_limit, require_id, MAX_LIMIT};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CflError, Result};
use crate::model::{Attachment, SavedFile};
use crate::pagination::ResultPage;
use crate::references::filter_unused;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Lists a page's attachments, optionally only those the page body never mentions.
///
/// Requests run in order: attachments first, then (only for `unused_only`, and
/// only when there is something to check) the page body.
pub fn list<C: ConfluenceApi>(
    client: &C,
    page_id: &str,
    limit: i64,
    unused_only: bool,
) -> Result<CmdResult> {
    let page_id = require_id("page id", page_id)?;
    let Some(limit) = page_limit(limit)? else {
        return Ok(CmdResult::default().with_attachments(ResultPage::empty()));
    };

    let attachments = client
        .list_attachments(page_id, limit)
        .map_err(|e| e.context("listing attachments"))?;

    if !unused_only || attachments.is_empty() {
        return Ok(CmdResult::default().with_attachments(attachments));
    }

    let page = client
        .get_page(page_id)
        .map_err(|e| e.context("fetching page content"))?;
    let unused: Vec<Attachment> = filter_unused(attachments.items(), page.storage())
        .into_iter()
        .cloned()
        .collect();
    debug!(
        "{} of {} attachments unused on page {}",
        unused.len(),
        attachments.len(),
        page_id
    );

    // Only the cursor carries over: a total would describe the unfiltered set.
    let cursor = attachments.next_cursor().map(str::to_string);
    let mut result = CmdResult::default();
    if unused.is_empty() {
        result.add_message(CmdMessage::info("All attachments are referenced on the page."));
    }
    Ok(result.with_attachments(ResultPage::new(unused).with_cursor(cursor)))
}

/// Uploads files one at a time. All paths are checked before the first request.
pub fn upload<C: ConfluenceApi>(client: &C, page_id: &str, files: &[PathBuf]) -> Result<CmdResult> {
    let page_id = require_id("page id", page_id)?;
    if files.is_empty() {
        return Err(CflError::validation("no files given to upload"));
    }
    if let Some(missing) = files.iter().find(|f| !f.is_file()) {
        return Err(CflError::validation(format!(
            "not a file: {}",
            missing.display()
        )));
    }

    let mut result = CmdResult::default();
    let mut uploaded = Vec::with_capacity(files.len());
    for file in files {
        let attachment = client
            .upload_attachment(page_id, file)
            .map_err(|e| e.context("uploading attachment"))?;
        result.add_message(CmdMessage::success(format!(
            "Uploaded {} ({})",
            attachment.title, attachment.id
        )));
        uploaded.push(attachment);
    }
    Ok(result.with_affected_attachments(uploaded))
}

/// Saves an attachment into `out_dir` under its display filename.
///
/// `attachment` may be the attachment id or its filename. Names are matched
/// against the first listing page only; when that listing is truncated, an id
/// is looked up directly.
pub fn download<C: ConfluenceApi>(
    client: &C,
    page_id: &str,
    attachment: &str,
    out_dir: &Path,
) -> Result<CmdResult> {
    let page_id = require_id("page id", page_id)?;
    let wanted = require_id("attachment", attachment)?;

    let listing = client
        .list_attachments(page_id, MAX_LIMIT)
        .map_err(|e| e.context("downloading attachment"))?;
    let truncated = listing.has_more();
    let listed = listing
        .into_items()
        .into_iter()
        .find(|a| a.id == wanted || a.title == wanted);
    let found = match listed {
        Some(attachment) => attachment,
        None if truncated => fetch_by_id(client, page_id, wanted)?,
        None => return Err(attachment_not_found(page_id, wanted)),
    };

    let bytes = client
        .download_attachment(&found)
        .map_err(|e| e.context("downloading attachment"))?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(safe_file_name(&found.title));
    fs::write(&path, &bytes)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Saved {} ({} bytes)",
        path.display(),
        bytes.len()
    )));
    Ok(result.with_saved_files(vec![SavedFile {
        path,
        bytes: bytes.len(),
    }]))
}

fn fetch_by_id<C: ConfluenceApi>(client: &C, page_id: &str, id: &str) -> Result<Attachment> {
    debug!("attachment '{}' not in first listing page, fetching by id", id);
    match client.get_attachment(id) {
        Ok(attachment) if attachment.page_id.as_deref().map_or(true, |p| p == page_id) => {
            Ok(attachment)
        }
        Ok(_) => Err(attachment_not_found(page_id, id)),
        Err(e) if e.is_not_found() => Err(attachment_not_found(page_id, id)),
        Err(e) => Err(e.context("downloading attachment")),
    }
}

fn attachment_not_found(page_id: &str, wanted: &str) -> CflError {
    CflError::NotFound(format!("attachment '{}' on page {}", wanted, page_id))
}

pub fn delete<C: ConfluenceApi>(client: &C, id: &str) -> Result<CmdResult> {
    let id = require_id("attachment id", id)?;
    client
        .delete_attachment(id)
        .map_err(|e| e.context("deleting attachment"))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted attachment {}", id)));
    Ok(result)
}

/// Keeps only the final path component so a crafted title cannot escape `out_dir`.
fn safe_file_name(title: &str) -> String {
    let name = title
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(title)
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        "attachment".to_string()
    } else {
        name.to_string()
    }
}
