//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware progress, warning and error messages
//!
//! All progress reporting goes through this module so `--quiet` and
//! `--debug` behave the same everywhere.

pub mod output;
