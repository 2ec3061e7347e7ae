//! PteroSync Sync - Directory synchronization engine
//!
//! Provides:
//! - Local tree scanning with hidden-entry exclusion
//! - Minimal remote folder planning with parent-first ordering
//! - Idempotent remote folder materialization
//! - Bounded-concurrency uploads with per-file failure isolation
//! - Target discovery, filtering and per-target orchestration
//!
//! ## Modules
//!
//! - [`engine`] - Orchestrator running the full push across targets
//! - [`scanner`] - Local tree walk
//! - [`planner`] - Directory plan and upload tasks
//! - [`materializer`] - Remote folder creation
//! - [`upload`] - Two-phase file uploads
//! - [`targets`] - Target filtering
//! - [`retry`] - Exponential backoff for transient errors

pub mod engine;
pub mod materializer;
pub mod planner;
pub mod retry;
pub mod scanner;
pub mod targets;
pub mod upload;

#[cfg(test)]
mod fake_panel;

pub use engine::{EngineOptions, SyncEngine, SyncReport, TargetReport, TargetStatus};
pub use planner::DirectoryPlan;
pub use retry::RetryPolicy;
pub use targets::{Eligibility, TargetFilter};
