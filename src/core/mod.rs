//! core
//!
//! Domain types and local (non-network) operations.
//!
//! # Modules
//!
//! - [`types`] - Release target, descriptor, policies, asset files
//! - [`config`] - Raw configuration, loading, and validation
//! - [`resolve`] - Literal-or-file-content values
//! - [`files`] - Glob expansion of file patterns
//! - [`checksum`] - Checksum file generation

pub mod checksum;
pub mod config;
pub mod files;
pub mod resolve;
pub mod types;
