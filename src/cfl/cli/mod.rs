//! # CLI Behavior
//!
//! This is **one possible UI client** for cfl, not the library itself. Everything
//! under `cli/` is private to the binary.
//!
//! ## Output
//!
//! `--output table` (default) renders aligned, styled columns. `--output json`
//! prints the items as pretty JSON and moves all human-oriented messages to
//! stderr. `--output plain` prints tab-separated lines for `cut`/`awk`.
//!
//! Listings show one page of results. When the server has more, a notice on
//! stderr suggests raising `--limit`.
//!
//! ## Page Bodies
//!
//! `page create` and `page edit` take the storage-format body from `--body`,
//! then `--file`, then piped stdin:
//!
//! ```bash
//! cat notes.html | cfl page create --space DEV --title "Notes"
//! ```
//!
//! ## Destructive Commands
//!
//! `page delete` and `attachment delete` ask for confirmation on stderr. With
//! stdin not attached to a terminal they refuse unless `--force` is given.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print output
//! - `render`: Output formatting (tables, JSON, plain, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling
//! - `templates`: Output templates
//! - `complete`: Shell completion scripts

mod commands;
mod complete;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
