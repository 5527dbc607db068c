//! Keeps the single `Fix timeline:` label in step with the resolution date.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};

use super::batch::run_batch;
use super::labels::{LabelKind, fix_timeline_label, parse_label};
use super::models::Issue;
use super::timeline::TimelinePolicy;
use crate::infra::github::{IssueClient, LabelClient, is_not_found, is_unprocessable};

const SECONDS_PER_DAY: i64 = 86_400;
const DONE_TEXT: &str = "Done";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// The fix-timeline label the issue carries after the sync.
    pub label: String,
    /// Stale fix-timeline labels taken off the issue.
    pub removed: Vec<String>,
    /// Whether the target label had to be created and attached.
    pub attached: bool,
}

pub struct LabelSynchronizer<'a, C: ?Sized> {
    client: &'a C,
    timeline: &'a TimelinePolicy,
}

impl<'a, C: IssueClient + LabelClient + ?Sized> LabelSynchronizer<'a, C> {
    pub fn new(client: &'a C, timeline: &'a TimelinePolicy) -> Self {
        Self { client, timeline }
    }

    /// Reconcile the issue's fix-timeline labels with the remaining time.
    ///
    /// A second call with the same inputs on the updated issue performs no
    /// mutation.
    pub async fn add_fix_timeline_label(
        &self,
        issue: &Issue,
        resolution_date: NaiveDate,
        issue_done: bool,
        now: DateTime<Utc>,
    ) -> anyhow::Result<SyncOutcome> {
        let days = days_remaining(resolution_date, now);
        let (text, color) = if issue_done {
            // Done only borrows a color, so an uncovered range takes the last bucket's.
            let bucket = self
                .timeline
                .bucket_for(days)
                .or_else(|err| self.timeline.buckets().last().ok_or(err))?;
            (DONE_TEXT, bucket.color.as_str())
        } else {
            let bucket = self.timeline.bucket_for(days)?;
            (bucket.text.as_str(), bucket.color.as_str())
        };
        let target = fix_timeline_label(text);

        let existing: Vec<&str> = issue
            .labels
            .iter()
            .filter(|l| matches!(parse_label(&l.name), LabelKind::FixTimeline(_)))
            .map(|l| l.name.as_str())
            .collect();
        let already_attached = issue.has_label(&target);
        let stale: Vec<String> = existing
            .into_iter()
            .filter(|name| *name != target)
            .map(str::to_string)
            .collect();

        let removed = run_batch(stale, |name| async move {
            match self.client.remove_label(issue, &name).await {
                Err(e) if is_not_found(&e) => {
                    debug!(issue = issue.number, label = %name, "label already removed");
                    Ok(())
                }
                result => result,
            }
        })
        .await
        .into_result("remove label")?;

        if !already_attached {
            self.create_and_attach(issue, &target, color).await?;
            info!(issue = issue.number, label = %target, days, "fix timeline updated");
        }

        Ok(SyncOutcome {
            label: target,
            removed,
            attached: !already_attached,
        })
    }

    async fn create_and_attach(&self, issue: &Issue, name: &str, color: &str) -> anyhow::Result<()> {
        match self.client.create_label(&issue.repo, name, color).await {
            Err(e) if is_unprocessable(&e) => {
                debug!(label = %name, "label definition already exists");
            }
            result => result?,
        }

        match self.client.add_labels(issue, &[name.to_string()]).await {
            Err(e) if is_unprocessable(&e) => {
                debug!(issue = issue.number, label = %name, "label already attached");
                Ok(())
            }
            result => result,
        }
    }
}

/// Whole days from `now` until the start (UTC) of `resolution_date`, rounded down.
pub fn days_remaining(resolution_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let deadline = resolution_date.and_time(NaiveTime::MIN).and_utc();
    (deadline - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}
