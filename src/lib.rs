//! gitea-release - publish a release and its build artifacts to a Gitea server
//!
//! Designed to run as a CI step: it finds or creates the release for a tag,
//! optionally edits it, and uploads files (plus optional checksum files) as
//! release attachments, resolving name collisions with existing attachments.
//!
//! # Architecture
//!
//! - [`cli`] - Argument/environment parsing, wiring, exit status
//! - [`core`] - Configuration, validation, and local file handling
//! - [`engine`] - Release reconciliation and asset synchronization
//! - [`forge`] - Forge abstraction, Gitea REST client, in-memory mock
//! - [`ui`] - Progress and diagnostic output
//! - [`error`] - Run-level error type
//!
//! # Guarantees
//!
//! 1. Every configuration check runs before the first network call
//! 2. At most one release per tag is used, the first one the forge lists
//! 3. Under the `fail` policy no attachment is deleted or uploaded when any
//!    file collides
//! 4. Remote calls are sequential and never retried

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod forge;
pub mod ui;
