use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::infra::github::{OctocrabClient, Tracker};
use crate::shared::config::{Config, load_config};
use crate::shared::env_var::EnvVars;
use crate::sla::models::LabelEvent;
use crate::sla::{SlaEngine, TriggerOutcome};

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct LabeledArgs {
    /// Webhook payload file (default: $GITHUB_EVENT_PATH)
    #[arg(long)]
    pub event: Option<PathBuf>,
}

pub async fn run(
    args: &LabeledArgs,
    config_path: Option<&Path>,
    env: &EnvVars,
) -> anyhow::Result<()> {
    let event = read_event(&resolve_event_path(args, env)?)?;
    let config = load_config(config_path)?;
    let client = OctocrabClient::from_env(env)?;
    run_with_client(&event, &config, &client).await
}

/// Internal implementation that accepts a client for testability.
pub(crate) async fn run_with_client<T: Tracker + ?Sized>(
    event: &LabelEvent,
    config: &Config,
    client: &T,
) -> anyhow::Result<()> {
    match SlaEngine::new(client, config).handle_label_event(event).await? {
        TriggerOutcome::Skipped(reason) => {
            println!("#{} skipped ({reason:?})", event.issue.number);
        }
        TriggerOutcome::Processed(report) => {
            println!(
                "#{} resolve by {} -> {}",
                report.number, report.resolution_date, report.label
            );
        }
    }
    Ok(())
}

fn resolve_event_path(args: &LabeledArgs, env: &EnvVars) -> anyhow::Result<PathBuf> {
    args.event
        .clone()
        .or_else(|| env.github_event_path.as_ref().map(PathBuf::from))
        .context("No event payload given. Pass --event <file> or set GITHUB_EVENT_PATH")
}

fn read_event(path: &Path) -> anyhow::Result<LabelEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid event payload {}", path.display()))
}
