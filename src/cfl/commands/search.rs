use crate::client::ConfluenceApi;
use crate::commands::helpers::page_limit;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::pagination::ResultPage;
use crate::query::{compile, SearchFilter};

/// Compiles the filter and runs the search.
///
/// Compilation happens first so that a bad filter never reaches the network. A
/// limit of zero returns an empty page without a request.
pub fn run<C: ConfluenceApi>(client: &C, filter: &SearchFilter) -> Result<CmdResult> {
    let cql = compile(filter)?;

    let Some(limit) = page_limit(filter.limit)? else {
        return Ok(CmdResult::default().with_hits(ResultPage::empty()));
    };

    let hits = client
        .search(&cql, limit)
        .map_err(|e| e.context("search"))?;

    let mut result = CmdResult::default();
    if hits.is_empty() {
        result.add_message(CmdMessage::info("No results found."));
    }
    Ok(result.with_hits(hits))
}
