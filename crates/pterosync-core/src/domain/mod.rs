//! Domain entities
//!
//! This module contains the core domain types for PteroSync:
//! - Newtypes for validated remote paths
//! - Local files and the upload tasks derived from them
//! - Remote targets
//! - Domain-specific error types

pub mod errors;
pub mod files;
pub mod newtypes;
pub mod target;

// Re-export commonly used types
pub use errors::{DomainError, SyncError};
pub use files::{LocalFile, UploadTask};
pub use newtypes::RemotePath;
pub use target::RemoteTarget;
