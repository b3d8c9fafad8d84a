//! `resub` is a library for regex find-and-replace across files, directory
//! trees and standard input.
//!
//! It provides the core logic for the `resub` command-line tool but can also be
//! used as a standalone library. The main components are:
//!
//! - `Transform` / `TransformChain`: compiled pattern/replacement pairs applied
//!   in order to raw bytes.
//! - `Walker`: the filtered directory walk (depth, hidden entries, glob) that
//!   fans selected entries out to a Rayon pool and waits for them.
//! - `Editor`: renames entries and rewrites file contents, or edits a stream.
//! - `config`: turns parsed command-line arguments (and optional YAML rules
//!   files) into a validated run configuration.

pub mod cli;
pub mod config;
pub mod editor;
pub mod errors;
pub mod transform;
pub mod walker;

// Re-export main types for easier access by library users.
pub use config::{Config, Targets, WalkOptions};
pub use editor::{Editor, FileTask};
pub use errors::{Error, Result};
pub use transform::{Transform, TransformChain};
pub use walker::{WalkStats, Walker};
