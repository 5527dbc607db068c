//! Drives one issue through the SLA lifecycle, and the two entry points that
//! feed it: the periodic sweep and the label-change trigger.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use super::error::SlaError;
use super::labels::{LabelKind, parse_label};
use super::ledger::CommentLedger;
use super::models::{Issue, LabelEvent, RepoRef};
use super::release::check_release;
use super::sync::LabelSynchronizer;
use crate::infra::github::Tracker;
use crate::shared::config::Config;

/// Result of processing a single issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReport {
    pub number: u64,
    pub resolution_date: NaiveDate,
    /// URL of the active `Resolution Date:` comment.
    pub comment_url: String,
    /// Whether that comment was posted during this run.
    pub comment_created: bool,
    /// The fix-timeline label the issue carries afterwards.
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PullRequest,
    Closed,
    Released,
    NoSeverity,
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub processed: Vec<IssueReport>,
    pub skipped: Vec<(u64, SkipReason)>,
    pub failed: Vec<(u64, anyhow::Error)>,
}

impl SweepReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Skipped(SkipReason),
    Processed(IssueReport),
}

pub struct SlaEngine<'a, T: ?Sized> {
    tracker: &'a T,
    config: &'a Config,
    now: DateTime<Utc>,
}

impl<'a, T: Tracker + ?Sized> SlaEngine<'a, T> {
    pub fn new(tracker: &'a T, config: &'a Config) -> Self {
        Self::at(tracker, config, Utc::now())
    }

    /// Engine evaluating remaining time against a fixed instant.
    pub fn at(tracker: &'a T, config: &'a Config, now: DateTime<Utc>) -> Self {
        Self {
            tracker,
            config,
            now,
        }
    }

    /// Keep the existing resolution date, or record one if the issue has none.
    pub async fn process_issue(&self, issue: &Issue) -> anyhow::Result<IssueReport> {
        self.process(issue, false).await
    }

    /// Like [`Self::process_issue`], but retires every recorded resolution
    /// date first so the deadline is recomputed from the current labels.
    pub async fn process_issue_label_change(&self, issue: &Issue) -> anyhow::Result<IssueReport> {
        self.process(issue, true).await
    }

    async fn process(&self, issue: &Issue, retire: bool) -> anyhow::Result<IssueReport> {
        let tier = severity_of(issue)?;
        let severity = self.config.severities.config_for(tier)?;

        let release = check_release(self.tracker, issue, &self.config.releases).await?;

        let ledger = CommentLedger::new(self.tracker);
        if retire {
            ledger.retire_resolution_date_comments(issue).await?;
        }

        let lookup = ledger.get_resolution_date(issue, severity).await?;
        let (comment_url, comment_created) = match lookup.existing_comment {
            Some(url) => (url, false),
            None => {
                let url = ledger
                    .add_resolution_date_comment(issue, lookup.resolution_date)
                    .await?;
                (url, true)
            }
        };

        let issue_done = release.released || release.release.is_some();
        let sync = LabelSynchronizer::new(self.tracker, &self.config.timeline)
            .add_fix_timeline_label(issue, lookup.resolution_date, issue_done, self.now)
            .await?;

        info!(
            issue = issue.number,
            severity = tier,
            resolution_date = %lookup.resolution_date,
            label = %sync.label,
            replaced = sync.removed.len(),
            attached = sync.attached,
            url = %issue.html_url,
            "issue processed"
        );

        Ok(IssueReport {
            number: issue.number,
            resolution_date: lookup.resolution_date,
            comment_url,
            comment_created,
            label: sync.label,
        })
    }

    /// Process every open issue of `repo` one at a time.
    ///
    /// A failing issue is logged and recorded; it never stops the sweep.
    pub async fn sweep(&self, repo: &RepoRef) -> anyhow::Result<SweepReport> {
        let issues = self.tracker.list_open_issues(repo).await?;
        info!(repo = %repo, issues = issues.len(), "sweep started");

        let mut report = SweepReport::default();
        for issue in &issues {
            if let Some(reason) = sweep_skip_reason(issue) {
                debug!(issue = issue.number, ?reason, "skipped");
                report.skipped.push((issue.number, reason));
                continue;
            }
            match self.process_issue(issue).await {
                Ok(processed) => report.processed.push(processed),
                Err(e) => {
                    log_failure(issue.number, &e);
                    report.failed.push((issue.number, e));
                }
            }
        }

        info!(
            repo = %repo,
            processed = report.processed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "sweep finished"
        );
        Ok(report)
    }

    /// React to a label being added to or removed from an issue.
    pub async fn handle_label_event(&self, event: &LabelEvent) -> anyhow::Result<TriggerOutcome> {
        let issue = &event.issue;
        info!(
            action = %event.action,
            label = event.label_name(),
            issue = issue.number,
            "label event received"
        );

        if !issue.is_open() {
            debug!(issue = issue.number, "issue is closed");
            return Ok(TriggerOutcome::Skipped(SkipReason::Closed));
        }

        match self.process_issue_label_change(issue).await {
            Ok(report) => Ok(TriggerOutcome::Processed(report)),
            Err(e) => {
                log_failure(issue.number, &e);
                Err(e)
            }
        }
    }
}

/// The single `SEV-` label of an issue.
pub fn severity_of(issue: &Issue) -> Result<&str, SlaError> {
    let tiers: Vec<&str> = issue
        .labels
        .iter()
        .filter_map(|l| match parse_label(&l.name) {
            LabelKind::Severity(tier) => Some(tier),
            _ => None,
        })
        .collect();

    match tiers.as_slice() {
        [] => Err(SlaError::MissingSeverity),
        [tier] => Ok(*tier),
        _ => Err(SlaError::TooManySeverities(tiers.len())),
    }
}

fn sweep_skip_reason(issue: &Issue) -> Option<SkipReason> {
    let kinds: Vec<LabelKind<'_>> = issue.labels.iter().map(|l| parse_label(&l.name)).collect();
    if issue.is_pull_request {
        Some(SkipReason::PullRequest)
    } else if !issue.is_open() {
        Some(SkipReason::Closed)
    } else if kinds.contains(&LabelKind::Released) {
        Some(SkipReason::Released)
    } else if !kinds.iter().any(|k| matches!(k, LabelKind::Severity(_))) {
        Some(SkipReason::NoSeverity)
    } else {
        None
    }
}

/// Input errors are reported as warnings; anything else is treated as transient.
fn log_failure(number: u64, err: &anyhow::Error) {
    if err.downcast_ref::<SlaError>().is_some() {
        warn!(issue = number, error = %format!("{err:#}"), "issue rejected");
    } else {
        error!(issue = number, error = %format!("{err:#}"), "failed to process issue");
    }
}
