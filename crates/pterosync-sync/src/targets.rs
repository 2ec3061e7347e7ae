//! Target discovery and filtering
//!
//! Every server the API key can reach is a candidate. Filters apply in a
//! fixed order:
//!
//! 1. denylist: drop names containing any excluded fragment
//! 2. debug mode: keep only names containing the debug marker
//! 3. allow-list: keep only servers whose image is allowed (an empty list
//!    allows every image)

use pterosync_core::config::TargetsConfig;
use pterosync_core::domain::{RemoteTarget, SyncError};
use pterosync_core::ports::IPanelApi;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::retry::RetryPolicy;

/// Why a target was or was not selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    /// Name contains this denylisted fragment
    ExcludedName(String),
    /// Debug mode is on and the name lacks the marker
    NotDebugTarget,
    /// Image is not on the allow-list
    ImageNotAllowed,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Target selection rules
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    allowed_images: Vec<String>,
    exclude_names: Vec<String>,
    debug_marker: Option<String>,
}

impl TargetFilter {
    pub fn from_config(config: &TargetsConfig) -> Self {
        Self {
            allowed_images: config.allowed_images.clone(),
            exclude_names: config.exclude_names.clone(),
            debug_marker: config.debug.then(|| config.debug_marker.clone()),
        }
    }

    /// Enables debug mode with `marker`
    pub fn with_debug_marker(mut self, marker: impl Into<String>) -> Self {
        self.debug_marker = Some(marker.into());
        self
    }

    pub fn evaluate(&self, target: &RemoteTarget) -> Eligibility {
        if let Some(fragment) = self
            .exclude_names
            .iter()
            .find(|fragment| target.name.contains(fragment.as_str()))
        {
            return Eligibility::ExcludedName(fragment.clone());
        }

        if let Some(marker) = &self.debug_marker {
            if !target.name.contains(marker.as_str()) {
                return Eligibility::NotDebugTarget;
            }
        }

        if !self.allowed_images.is_empty() && !self.allowed_images.contains(&target.image) {
            return Eligibility::ImageNotAllowed;
        }

        Eligibility::Eligible
    }

    /// Keeps the eligible targets, logging the others at debug level
    pub fn apply(&self, targets: Vec<RemoteTarget>) -> Vec<RemoteTarget> {
        targets
            .into_iter()
            .filter(|target| match self.evaluate(target) {
                Eligibility::Eligible => true,
                reason => {
                    debug!(server = %target, ?reason, "Target excluded");
                    false
                }
            })
            .collect()
    }
}

/// Lists every reachable target with its eligibility
pub async fn survey_targets(
    api: &dyn IPanelApi,
    filter: &TargetFilter,
    retry: RetryPolicy,
    cancel: &CancellationToken,
) -> Result<Vec<(RemoteTarget, Eligibility)>, SyncError> {
    let targets = retry.run("list_targets", cancel, || api.list_targets()).await?;
    Ok(targets
        .into_iter()
        .map(|target| {
            let eligibility = filter.evaluate(&target);
            (target, eligibility)
        })
        .collect())
}

/// Lists the targets a run should upload to
#[tracing::instrument(skip_all)]
pub async fn discover_targets(
    api: &dyn IPanelApi,
    filter: &TargetFilter,
    retry: RetryPolicy,
    cancel: &CancellationToken,
) -> Result<Vec<RemoteTarget>, SyncError> {
    let all = retry.run("list_targets", cancel, || api.list_targets()).await?;
    let total = all.len();
    let selected = filter.apply(all);

    info!(total, selected = selected.len(), "Targets discovered");
    Ok(selected)
}
