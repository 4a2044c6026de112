//! # cfl Architecture
//!
//! cfl is a Confluence client library with a command-line front end. The CLI is one
//! consumer of the library; nothing below the CLI knows about terminals.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders tables/JSON/plain text         │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Supplies configured defaults (default space)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, sequencing of requests, result shaping       │
//! │  - Pure helpers: query (CQL), pagination, references        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport Layer (client/)                                  │
//! │  - ConfluenceApi trait                                      │
//! │  - HttpClient (production), MemoryClient (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Validation Before Network
//!
//! Anything the user can get wrong (an empty search, an unknown content type, a
//! negative `--limit`, a missing space) is rejected in the command layer before
//! the client is touched. Tests assert this by checking the `MemoryClient` call log.
//!
//! ## One Page Per Invocation
//!
//! List operations return a single [`pagination::ResultPage`]. Its `has_more()`
//! flag tells the CLI to suggest a larger `--limit`; pages are never walked
//! automatically, so output stays bounded and scriptable.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`client`]: Transport abstraction and implementations
//! - [`query`]: Search filters compiled to CQL
//! - [`pagination`]: Uniform has-more signal
//! - [`references`]: Attachment reference matching
//! - [`model`]: Records exchanged with Confluence
//! - [`config`]: Configuration file and environment overrides
//! - [`error`]: Error types

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod query;
pub mod references;
