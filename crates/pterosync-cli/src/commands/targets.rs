//! Targets command - List servers and whether a sync would touch them

use anyhow::{Context, Result};
use clap::Args;
use pterosync_core::config::Config;
use pterosync_core::domain::RemoteTarget;
use pterosync_sync::retry::RetryPolicy;
use pterosync_sync::targets::survey_targets;
use pterosync_sync::{Eligibility, TargetFilter};
use tokio_util::sync::CancellationToken;

use super::{cancel_on_shutdown, connect, ensure_valid, CommandContext};
use crate::output::{plural, Outcome};

/// Options for `pterosync targets`
#[derive(Debug, Args)]
pub struct TargetsCommand {
    /// Evaluate with debug mode on
    #[arg(long)]
    pub debug: bool,
}

impl TargetsCommand {
    /// Lists every server with its eligibility under the configured filters
    pub async fn survey(
        &self,
        config: &Config,
        cancel: &CancellationToken,
    ) -> Result<Vec<(RemoteTarget, Eligibility)>> {
        let mut filter = TargetFilter::from_config(&config.targets);
        if self.debug {
            filter = filter.with_debug_marker(config.targets.debug_marker.clone());
        }

        let provider = connect(config)?;
        survey_targets(
            provider.as_ref(),
            &filter,
            RetryPolicy::from_config(&config.network),
            cancel,
        )
        .await
        .context("Failed to list servers")
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config()?;
        ensure_valid(&config)?;

        let cancel = cancel_on_shutdown();
        let survey = self.survey(&config, &cancel).await?;

        if ctx.is_json() {
            let entries: Vec<_> = survey
                .iter()
                .map(|(target, eligibility)| {
                    serde_json::json!({
                        "target": target,
                        "eligible": eligibility.is_eligible(),
                        "eligibility": eligibility,
                    })
                })
                .collect();
            formatter.print_json(&serde_json::Value::Array(entries));
            return Ok(());
        }

        let selected = survey.iter().filter(|(_, e)| e.is_eligible()).count();
        formatter.success(&format!(
            "{} selected of {}",
            selected,
            plural(survey.len(), "server")
        ));
        for (target, eligibility) in &survey {
            let outcome = if eligibility.is_eligible() {
                Outcome::Ok
            } else {
                Outcome::Skipped
            };
            formatter.outcome(
                outcome,
                &target.to_string(),
                &format!("{} [{}]", describe(eligibility), target.image),
            );
        }
        Ok(())
    }
}

/// Short human description of an eligibility verdict
fn describe(eligibility: &Eligibility) -> String {
    match eligibility {
        Eligibility::Eligible => "selected".to_string(),
        Eligibility::ExcludedName(fragment) => format!("name contains '{fragment}'"),
        Eligibility::NotDebugTarget => "not a debug server".to_string(),
        Eligibility::ImageNotAllowed => "image not allowed".to_string(),
    }
}
