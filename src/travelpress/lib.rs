//! # Travelpress Architecture
//!
//! Travelpress is a **UI-agnostic publishing library** for a block-based travel blog.
//! The admin CLI shipped with it is one client; a web front end could be another.
//!
//! ## The Layers
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
//! │  - Gates authoring behind the signed-in user                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult                        │
//! │  - Built on composer, publisher, viewer                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators (store/, upload/, imaging/, auth.rs)         │
//! │  - DocumentStore, FileUploader, ImageBackend, Authenticator │
//! │  - Production + in-memory implementations of each           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Publishing Flow
//!
//! The [`composer::Composer`] accumulates an ordered list of text and image blocks.
//! The [`publisher::Publisher`] walks that list left to right, runs every pending
//! image through the [`imaging`] pipeline and the [`upload`] client one at a time,
//! and only then performs a single document write. Any failure before that write
//! leaves the stored article exactly as it was.
//!
//! Editing an existing article goes through [`viewer::EditSession`], which deep-clones
//! the persisted blocks into a fresh composer (the Working Draft). Cancelling drops it;
//! publishing overwrites the whole block sequence.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust values and returns regular Rust types.
//! It never writes to stdout/stderr and never calls `std::process::exit`. Diagnostics
//! go through `tracing`; the binary decides whether anyone listens.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`model`]: `Block`, `Article` and their derived read helpers
//! - [`composer`]: The mutable block sequence used while authoring
//! - [`imaging`]: Decode, downscale and recompress images
//! - [`upload`]: Hosted file store clients
//! - [`publisher`]: Resolves uploads and persists articles
//! - [`viewer`]: Read path and the Working Draft edit session
//! - [`auth`]: Identity and ownership checks
//! - [`store`]: Document storage abstraction and implementations
//! - [`manuscript`]: Markdown manuscripts ↔ block sequences
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod commands;
pub mod composer;
pub mod config;
pub mod error;
pub mod imaging;
pub mod manuscript;
pub mod model;
pub mod publisher;
pub mod store;
pub mod upload;
pub mod viewer;
