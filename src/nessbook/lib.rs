//! # Nessbook Architecture
//!
//! Nessbook is a client library for the NessBook reading tracker: a personal
//! collection of books with ratings, reading dates, quotes and a manual display
//! order. The `nessbook` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns the session, signs out on a rejected credential     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per user action, returns CmdResult            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collection Layer (collection/)                             │
//! │  - CollectionStore: books, view query, manual order, stats  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators                                              │
//! │  - repository/: BookRepository (HttpRepository, in-memory)  │
//! │  - prefs/: PreferenceStore (file, in-memory)                │
//! │  - session.rs: signed-in user and credential                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular arguments and returns
//! `Result<CmdResult>`. It never prints and never exits. Remote and local
//! persistence sit behind traits, so every layer above them is tested with the
//! in-memory implementations.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Logic for each user action
//! - [`collection`]: Collection store, ordering, views and statistics
//! - [`repository`]: Remote book API abstraction and implementations
//! - [`prefs`]: Local key-value preferences
//! - [`session`]: Signed-in user lifecycle
//! - [`model`]: Core data types (`BookRecord`, `Schedule`, `Ratings`)
//! - [`config`]: Configuration and data directory
//! - [`image`]: Embedding local cover images
//! - [`error`]: Error types

pub mod api;
pub mod collection;
pub mod commands;
pub mod config;
pub mod error;
pub mod image;
pub mod model;
pub mod prefs;
pub mod repository;
pub mod session;
