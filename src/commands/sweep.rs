use std::path::Path;

use anyhow::Context;
use clap::Args;

use crate::infra::github::{OctocrabClient, Tracker};
use crate::shared::config::{Config, load_config};
use crate::shared::env_var::EnvVars;
use crate::sla::models::RepoRef;
use crate::sla::{SlaEngine, SweepReport};

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct SweepArgs {
    /// Repository as owner/name (default: $GITHUB_REPOSITORY)
    #[arg(long)]
    pub repo: Option<String>,
}

pub async fn run(args: &SweepArgs, config_path: Option<&Path>, env: &EnvVars) -> anyhow::Result<()> {
    let repo = resolve_repo(args.repo.as_deref(), env)?;
    let config = load_config(config_path)?;
    let client = OctocrabClient::from_env(env)?;
    run_with_client(&repo, &config, &client).await
}

/// Internal implementation that accepts a client for testability.
pub(crate) async fn run_with_client<T: Tracker + ?Sized>(
    repo: &RepoRef,
    config: &Config,
    client: &T,
) -> anyhow::Result<()> {
    let report = SlaEngine::new(client, config).sweep(repo).await?;
    print_summary(&report);

    if report.has_failures() {
        let numbers: Vec<String> = report
            .failed
            .iter()
            .map(|(number, _)| format!("#{number}"))
            .collect();
        anyhow::bail!(
            "{} issue(s) failed: {}",
            report.failed.len(),
            numbers.join(", ")
        );
    }
    Ok(())
}

fn resolve_repo(arg: Option<&str>, env: &EnvVars) -> anyhow::Result<RepoRef> {
    let raw = arg
        .or(env.github_repository.as_deref())
        .context("No repository given. Pass --repo owner/name or set GITHUB_REPOSITORY")?;
    Ok(RepoRef::parse(raw)?)
}

fn print_summary(report: &SweepReport) {
    for issue in &report.processed {
        let marker = if issue.comment_created { " (new)" } else { "" };
        println!(
            "#{} resolve by {}{marker} -> {}",
            issue.number, issue.resolution_date, issue.label
        );
    }
    println!(
        "{} processed, {} skipped, {} failed",
        report.processed.len(),
        report.skipped.len(),
        report.failed.len()
    );
}
