//! # Rendering
//!
//! Turns command results into text for one of the three output formats.
//!
//! - `table`: minijinja templates (see `templates.rs`) styled through the theme in
//!   `styles.rs`. Column layout is computed here: widths are measured with
//!   `unicode-width` so CJK titles and emoji line up, and over-long cells are
//!   truncated with an ellipsis.
//! - `json`: the items themselves, pretty-printed with `serde_json`.
//! - `plain`: one tab-separated line per item, never styled.
//!
//! Messages are rendered separately from data so the CLI can route them to
//! stderr when stdout must stay machine readable.

use super::setup::OutputFormat;
use super::styles::{self, names};
use super::templates::{MESSAGES_TEMPLATE, PAGE_TEMPLATE, SETTINGS_TEMPLATE, TABLE_TEMPLATE};
use cfl::api::{CmdMessage, MessageLevel};
use cfl::error::Result;
use cfl::model::{Attachment, Page, SavedFile, SearchHit, Space};
use chrono::{DateTime, Utc};
use minijinja::{context, Environment};
use serde::Serialize;
use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const COLUMN_GAP: usize = 2;
const RULE_WIDTH: usize = 60;

/// Widest a free-text column (titles, names) may grow before truncation.
pub const MAX_TEXT_WIDTH: usize = 60;

#[derive(Serialize)]
struct Cell {
    text: String,
    pad: String,
    style: &'static str,
}

#[derive(Serialize)]
struct MetaLine {
    label: String,
    value: String,
    style: &'static str,
}

#[derive(Serialize)]
struct SettingLine {
    key: String,
    pad: String,
    value: String,
}

#[derive(Serialize)]
struct StyledMessage {
    content: String,
    style: &'static str,
}

/// A table column: header text plus the cap applied to its width.
struct Column {
    header: &'static str,
    max_width: usize,
}

impl Column {
    const fn new(header: &'static str, max_width: usize) -> Self {
        Self { header, max_width }
    }
}

pub struct Renderer {
    format: OutputFormat,
    use_color: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat, use_color: bool) -> Self {
        Self { format, use_color }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn hits(&self, hits: &[SearchHit]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(hits),
            OutputFormat::Plain => Ok(plain_lines(hits.iter().map(|h| {
                vec![
                    h.id.clone(),
                    h.content_type.clone(),
                    h.title.clone(),
                    h.space.clone().unwrap_or_default(),
                    h.url.clone(),
                ]
            }))),
            OutputFormat::Table => {
                let columns = [
                    Column::new("ID", 20),
                    Column::new("TYPE", 10),
                    Column::new("TITLE", MAX_TEXT_WIDTH),
                    Column::new("SPACE", 12),
                    Column::new("UPDATED", 16),
                ];
                let rows = hits
                    .iter()
                    .map(|h| {
                        vec![
                            (h.id.clone(), names::ID),
                            (h.content_type.clone(), names::MUTED),
                            (h.title.clone(), names::TITLE),
                            (h.space.clone().unwrap_or_default(), names::KEY),
                            (time_cell(h.last_modified), names::TIME),
                        ]
                    })
                    .collect();
                // The search command reports an empty result itself.
                self.table(&columns, rows, "")
            }
        }
    }

    pub fn spaces(&self, spaces: &[Space]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(spaces),
            OutputFormat::Plain => Ok(plain_lines(spaces.iter().map(|s| {
                vec![
                    s.id.clone(),
                    s.key.clone(),
                    s.name.clone(),
                    s.space_type.clone(),
                ]
            }))),
            OutputFormat::Table => {
                let columns = [
                    Column::new("ID", 20),
                    Column::new("KEY", 16),
                    Column::new("NAME", MAX_TEXT_WIDTH),
                    Column::new("TYPE", 12),
                ];
                let rows = spaces
                    .iter()
                    .map(|s| {
                        vec![
                            (s.id.clone(), names::ID),
                            (s.key.clone(), names::KEY),
                            (s.name.clone(), names::TITLE),
                            (s.space_type.clone(), names::MUTED),
                        ]
                    })
                    .collect();
                self.table(&columns, rows, "No spaces found.")
            }
        }
    }

    pub fn pages(&self, pages: &[Page]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(pages),
            OutputFormat::Plain => Ok(plain_lines(pages.iter().map(|p| {
                vec![
                    p.id.clone(),
                    p.title.clone(),
                    p.version_number().to_string(),
                    p.updated_at().map(|t| t.to_rfc3339()).unwrap_or_default(),
                ]
            }))),
            OutputFormat::Table => {
                let columns = [
                    Column::new("ID", 20),
                    Column::new("TITLE", MAX_TEXT_WIDTH),
                    Column::new("VERSION", 8),
                    Column::new("UPDATED", 16),
                ];
                let rows = pages
                    .iter()
                    .map(|p| {
                        vec![
                            (p.id.clone(), names::ID),
                            (p.title.clone(), names::TITLE),
                            (p.version_number().to_string(), names::MUTED),
                            (time_cell(p.updated_at()), names::TIME),
                        ]
                    })
                    .collect();
                self.table(&columns, rows, "No pages found.")
            }
        }
    }

    /// A single page. `raw` prints the storage body alone, whatever the format.
    pub fn page(&self, page: &Page, raw: bool) -> Result<String> {
        if raw {
            let mut body = page.storage().to_string();
            if !body.ends_with('\n') {
                body.push('\n');
            }
            return Ok(body);
        }

        match self.format {
            OutputFormat::Json => to_json(page),
            OutputFormat::Plain => Ok(format!(
                "{}\n{}\n",
                plain_line(&[
                    page.id.clone(),
                    page.title.clone(),
                    page.version_number().to_string(),
                ]),
                page.storage()
            )),
            OutputFormat::Table => {
                let mut meta = vec![
                    MetaLine {
                        label: "id:".into(),
                        value: page.id.clone(),
                        style: names::ID,
                    },
                    MetaLine {
                        label: "version:".into(),
                        value: page.version_number().to_string(),
                        style: names::REGULAR,
                    },
                ];
                if let Some(updated) = page.updated_at() {
                    meta.push(MetaLine {
                        label: "updated:".into(),
                        value: format_time_ago(updated),
                        style: names::TIME,
                    });
                }
                if let Some(parent) = &page.parent_id {
                    meta.push(MetaLine {
                        label: "parent:".into(),
                        value: parent.clone(),
                        style: names::ID,
                    });
                }

                self.template(
                    PAGE_TEMPLATE,
                    context! {
                        title => &page.title,
                        meta => &meta,
                        rule => "─".repeat(RULE_WIDTH),
                        body => page.storage().trim_end(),
                    },
                )
            }
        }
    }

    pub fn attachments(&self, attachments: &[Attachment]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(attachments),
            OutputFormat::Plain => Ok(plain_lines(attachments.iter().map(|a| {
                vec![
                    a.id.clone(),
                    a.title.clone(),
                    a.media_type.clone(),
                    a.file_size.to_string(),
                ]
            }))),
            OutputFormat::Table => {
                let columns = [
                    Column::new("ID", 20),
                    Column::new("FILENAME", MAX_TEXT_WIDTH),
                    Column::new("MEDIA TYPE", 30),
                    Column::new("SIZE", 10),
                ];
                let rows = attachments
                    .iter()
                    .map(|a| {
                        vec![
                            (a.id.clone(), names::ID),
                            (a.title.clone(), names::TITLE),
                            (a.media_type.clone(), names::MUTED),
                            (format_size(a.file_size), names::REGULAR),
                        ]
                    })
                    .collect();
                self.table(&columns, rows, "No attachments found.")
            }
        }
    }

    /// Table mode prints nothing here; the success message already names the file.
    pub fn saved_files(&self, files: &[SavedFile]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(files),
            OutputFormat::Plain => Ok(plain_lines(files.iter().map(|f| {
                vec![f.path.display().to_string(), f.bytes.to_string()]
            }))),
            OutputFormat::Table => Ok(String::new()),
        }
    }

    /// Config key/value pairs, already masked by the caller.
    pub fn settings(&self, items: &[(String, String)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = items
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect();
                to_json(&map)
            }
            OutputFormat::Plain => Ok(plain_lines(
                items.iter().map(|(k, v)| vec![k.clone(), v.clone()]),
            )),
            OutputFormat::Table => {
                let key_width = items.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
                let lines: Vec<SettingLine> = items
                    .iter()
                    .map(|(k, v)| SettingLine {
                        key: k.clone(),
                        pad: " ".repeat(key_width - k.width()),
                        value: v.clone(),
                    })
                    .collect();
                self.template(SETTINGS_TEMPLATE, context! { items => &lines })
            }
        }
    }

    /// A bare value (config get, config path). Identical in every format except JSON.
    pub fn value(&self, value: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&value),
            _ => Ok(format!("{}\n", value)),
        }
    }

    pub fn path(&self, path: &Path) -> Result<String> {
        self.value(&path.display().to_string())
    }

    pub fn messages(&self, messages: &[CmdMessage]) -> Result<String> {
        if messages.is_empty() {
            return Ok(String::new());
        }
        let styled: Vec<StyledMessage> = messages
            .iter()
            .map(|m| StyledMessage {
                content: m.content.clone(),
                style: message_style(m.level),
            })
            .collect();
        self.template(MESSAGES_TEMPLATE, context! { messages => &styled })
    }

    fn table(
        &self,
        columns: &[Column],
        rows: Vec<Vec<(String, &'static str)>>,
        empty_message: &str,
    ) -> Result<String> {
        let rows: Vec<Vec<(String, &'static str)>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(columns)
                    .map(|((text, style), col)| (truncate_to_width(&text, col.max_width), style))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                rows.iter()
                    .map(|row| row[i].0.width())
                    .chain(std::iter::once(col.header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header = layout_row(
            columns
                .iter()
                .map(|c| (c.header.to_string(), names::HEADER))
                .collect(),
            &widths,
        );
        let body: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| layout_row(row, &widths))
            .collect();

        self.template(
            TABLE_TEMPLATE,
            context! {
                header => &header,
                rows => &body,
                empty_message => empty_message,
            },
        )
    }

    fn template<S: Serialize>(&self, source: &str, ctx: S) -> Result<String> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        let use_color = self.use_color;
        env.add_filter("style", move |value: String, name: String| -> String {
            styles::apply(&name, &value, use_color)
        });

        Ok(env.render_str(source, ctx)?)
    }
}

/// Pads every cell but the last to its column width plus the gap.
fn layout_row(cells: Vec<(String, &'static str)>, widths: &[usize]) -> Vec<Cell> {
    let last = cells.len().saturating_sub(1);
    cells
        .into_iter()
        .enumerate()
        .map(|(i, (text, style))| {
            let pad = if i == last {
                String::new()
            } else {
                " ".repeat(widths[i].saturating_sub(text.width()) + COLUMN_GAP)
            };
            Cell { text, pad, style }
        })
        .collect()
}

fn message_style(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => names::INFO,
        MessageLevel::Success => names::SUCCESS,
        MessageLevel::Warning => names::WARNING,
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Tabs and newlines inside fields would break the line-per-record shape.
fn plain_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| f.replace(['\t', '\n', '\r'], " "))
        .collect::<Vec<_>>()
        .join("\t")
}

fn plain_lines<I: Iterator<Item = Vec<String>>>(rows: I) -> String {
    rows.map(|r| plain_line(&r) + "\n").collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn time_cell(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map(format_time_ago).unwrap_or_default()
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfl::model::Version;

    fn plain_table() -> Renderer {
        Renderer::new(OutputFormat::Table, false)
    }

    fn page(id: &str, title: &str) -> Page {
        Page {
            id: id.into(),
            title: title.into(),
            space_id: "1".into(),
            status: "current".into(),
            parent_id: None,
            version: Some(Version {
                number: 3,
                created_at: None,
                message: None,
            }),
            body: None,
        }
    }

    #[test]
    fn table_aligns_columns() {
        let out = plain_table()
            .pages(&[page("1", "Short"), page("12345", "A longer title")])
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID     TITLE"));
        let title_col = lines[0].find("TITLE").unwrap();
        assert_eq!(lines[1].find("Short").unwrap(), title_col);
        assert_eq!(lines[2].find("A longer title").unwrap(), title_col);
    }

    #[test]
    fn empty_table_prints_message() {
        let out = plain_table().pages(&[]).unwrap();
        assert_eq!(out, "No pages found.\n");
    }

    #[test]
    fn json_output_is_the_items() {
        let renderer = Renderer::new(OutputFormat::Json, false);
        let out = renderer.pages(&[page("7", "Seven")]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["id"], "7");
        assert_eq!(parsed[0]["title"], "Seven");
    }

    #[test]
    fn plain_output_is_tab_separated() {
        let renderer = Renderer::new(OutputFormat::Plain, true);
        let out = renderer.pages(&[page("7", "Tab\there")]).unwrap();
        assert_eq!(out, "7\tTab here\t3\t\n");
    }

    #[test]
    fn raw_page_is_body_only() {
        let mut p = page("1", "T");
        p.body = Some(cfl::model::PageBody {
            storage: Some(cfl::model::StorageBody::new("<p>x</p>")),
        });
        assert_eq!(plain_table().page(&p, true).unwrap(), "<p>x</p>\n");
    }

    #[test]
    fn page_view_has_title_and_body() {
        let mut p = page("1", "Runbook");
        p.body = Some(cfl::model::PageBody {
            storage: Some(cfl::model::StorageBody::new("<p>steps</p>")),
        });
        let out = plain_table().page(&p, false).unwrap();
        assert!(out.starts_with("Runbook\n"));
        assert!(out.contains("version: 3"));
        assert!(out.ends_with("<p>steps</p>\n"));
    }

    #[test]
    fn messages_render_one_per_line() {
        let out = plain_table()
            .messages(&[CmdMessage::info("one"), CmdMessage::warning("two")])
            .unwrap();
        assert_eq!(out, "one\ntwo\n");
    }

    #[test]
    fn every_message_level_has_a_themed_style() {
        let levels = [
            MessageLevel::Info,
            MessageLevel::Success,
            MessageLevel::Warning,
        ];
        let used: Vec<&str> = levels.into_iter().map(message_style).collect();
        assert_eq!(used, vec![names::INFO, names::SUCCESS, names::WARNING]);
        assert!(used.iter().all(|name| styles::THEME.contains_key(*name)));
    }

    #[test]
    fn settings_align_keys() {
        let out = plain_table()
            .settings(&[
                ("url".into(), "https://x".into()),
                ("api-token".into(), String::new()),
            ])
            .unwrap();
        assert_eq!(out, "url       = https://x\napi-token = (not set)\n");
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        // Wide characters count double.
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
