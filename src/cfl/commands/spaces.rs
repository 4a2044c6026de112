use crate::client::ConfluenceApi;
use crate::commands::helpers::{page_limit, require_id};
use crate::commands::CmdResult;
use crate::error::Result;
use crate::pagination::ResultPage;

pub fn list<C: ConfluenceApi>(client: &C, limit: i64) -> Result<CmdResult> {
    let Some(limit) = page_limit(limit)? else {
        return Ok(CmdResult::default().with_spaces(ResultPage::empty()));
    };
    let spaces = client
        .list_spaces(limit)
        .map_err(|e| e.context("listing spaces"))?;
    Ok(CmdResult::default().with_spaces(spaces))
}

pub fn view<C: ConfluenceApi>(client: &C, key: &str) -> Result<CmdResult> {
    let key = require_id("space key", key)?;
    let space = client
        .get_space(key)
        .map_err(|e| e.context("fetching space"))?;
    Ok(CmdResult::default().with_spaces(ResultPage::new(vec![space])))
}
