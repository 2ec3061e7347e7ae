//! PteroSync Core - Domain types, configuration and ports
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `RemotePath`, `LocalFile`, `UploadTask`, `RemoteTarget`
//! - **Error types** - `DomainError` for validation, `SyncError` for engine operations
//! - **Port definitions** - The `IPanelApi` trait implemented by the HTTP adapter
//! - **Configuration** - YAML-backed `Config` with validation and a builder
//!
//! # Architecture
//!
//! The domain module contains pure data types with no I/O. Ports define the
//! trait interface that adapter crates implement, and the sync engine drives
//! remote operations exclusively through that interface.

pub mod config;
pub mod domain;
pub mod ports;
