//! PteroSync Panel - client for the panel's file-management API
//!
//! Provides an async client for:
//! - Server discovery (the servers an API key can reach)
//! - Directory listing and folder creation on a server
//! - Signed upload URLs and streamed multipart uploads
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client and error mapping
//! - [`files`] - List, create-folder and upload-URL endpoints
//! - [`servers`] - Paginated server listing
//! - [`upload`] - Multipart transfer to a signed destination
//! - [`provider`] - [`IPanelApi`](pterosync_core::ports::IPanelApi) adapter

pub mod client;
pub mod files;
pub mod provider;
pub mod servers;
pub mod upload;

pub use client::PanelClient;
pub use provider::PanelProvider;
