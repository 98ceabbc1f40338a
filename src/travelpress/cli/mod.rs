//! # CLI Layer
//!
//! This module is **one possible UI client** for travelpress, not the application itself.
//!
//! It is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Parses arguments
//! - Installs a tracing subscriber
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: `run()`, context setup and per-command handlers
//! - `render`: turning `CmdResult`s into terminal output

mod commands;
mod render;
mod setup;

pub use commands::run;
