//! Styles for the cfl CLI.
//!
//! Templates never name colors. They name what a piece of text *is* (an id, a
//! timestamp, a warning) through the `style` filter, and this module maps those
//! semantic names to `console::Style`s.
//!
//! Two layers:
//!
//! 1. Semantic names (`names::*`), used in templates and renderers.
//! 2. The visual palette in [`THEME`], the only place colors are chosen.
//!
//! Unknown names render unstyled, so a typo in a template degrades to plain text
//! rather than failing the command.
use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const REGULAR: &str = "regular";
    pub const MUTED: &str = "muted";
    pub const FAINT: &str = "faint";
    pub const HEADER: &str = "header";
    pub const TITLE: &str = "title";
    pub const ID: &str = "id";
    pub const KEY: &str = "key";
    pub const TIME: &str = "time";
    pub const WARNING: &str = "warning";
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
}

pub static THEME: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    let mut theme = HashMap::new();
    theme.insert(names::REGULAR, Style::new());
    theme.insert(names::MUTED, Style::new().color256(245));
    theme.insert(names::FAINT, Style::new().color256(240));
    theme.insert(names::HEADER, Style::new().bold().underlined());
    theme.insert(names::TITLE, Style::new().bold());
    theme.insert(names::ID, Style::new().cyan());
    theme.insert(names::KEY, Style::new().yellow());
    theme.insert(names::TIME, Style::new().color256(245).italic());
    theme.insert(names::WARNING, Style::new().yellow());
    theme.insert(names::SUCCESS, Style::new().green());
    theme.insert(names::INFO, Style::new().color256(245));
    theme
});

/// Applies the named style. With `use_color` off the text passes through untouched.
pub fn apply(name: &str, text: &str, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    match THEME.get(name) {
        Some(style) => style.clone().force_styling(true).apply_to(text).to_string(),
        None => text.to_string(),
    }
}
