//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the sync engine depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IPanelApi`] - Remote file-management operations on panel servers

pub mod panel_api;

pub use panel_api::{CreateFolderOutcome, DirectoryEntry, IPanelApi, UploadDestination};
