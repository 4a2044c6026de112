//! # CLI Templates
//!
//! Terminal output is rendered from minijinja templates kept as standalone files
//! under `templates/` and embedded here as string constants.
//!
//! The environment renders with `trim_blocks` and `lstrip_blocks` on, so a block
//! tag never leaves a newline behind. A line that should end after a block tag is
//! followed by an empty line in the template source.
//!
//! Column widths, truncation and time formatting are computed in Rust (see
//! `render.rs`); templates only place text and pick semantic styles.
pub const TABLE_TEMPLATE: &str = include_str!("templates/table.tmp");
pub const PAGE_TEMPLATE: &str = include_str!("templates/page.tmp");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.tmp");
pub const SETTINGS_TEMPLATE: &str = include_str!("templates/settings.tmp");
