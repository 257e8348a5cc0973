//! forge
//!
//! Abstraction over the remote forge's release API.
//!
//! # Architecture
//!
//! The `Forge` trait defines the release and attachment operations the
//! synchronizer needs. The engine only sees `&dyn Forge`; the CLI decides
//! which implementation to construct.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`gitea`]: Gitea implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing

pub mod gitea;
pub mod mock;
mod traits;

pub use gitea::{GiteaForge, TransportConfig};
pub use traits::*;
