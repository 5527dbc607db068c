//! Resolution dates stored in the issue's comment stream.
//!
//! The comment stream is treated as an append-only log. A record is a comment
//! whose body starts with `Resolution Date:`; retiring wraps the body in
//! strikethrough, which also removes it from the active set. At most one
//! active record should exist per issue.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tracing::debug;

use super::batch::run_batch;
use super::error::SlaError;
use super::labels::{LabelKind, parse_label};
use super::models::{Comment, Issue};
use super::policy::SeverityConfig;
use crate::infra::github::CommentClient;

pub const RESOLUTION_MARKER: &str = "Resolution Date:";

/// Outcome of a resolution date lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionLookup {
    pub resolution_date: NaiveDate,
    /// URL of the active record the date was read from; `None` if it was computed.
    pub existing_comment: Option<String>,
}

pub struct CommentLedger<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: CommentClient + ?Sized> CommentLedger<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// The most recently created active record, if any.
    pub async fn find_active_record(&self, issue: &Issue) -> anyhow::Result<Option<Comment>> {
        let comments = self.client.list_comments(issue).await?;
        Ok(latest_active(comments))
    }

    pub async fn append_record(&self, issue: &Issue, date: NaiveDate) -> anyhow::Result<Comment> {
        let body = format!("{RESOLUTION_MARKER} {date}");
        self.client.create_comment(issue, &body).await
    }

    /// Retire every active record concurrently. Returns the retired comment IDs.
    pub async fn retire_records(&self, issue: &Issue) -> anyhow::Result<Vec<u64>> {
        let comments = self.client.list_comments(issue).await?;
        let active: Vec<(u64, String)> = comments
            .into_iter()
            .filter(is_active_record)
            .map(|c| (c.id, c.body))
            .collect();

        let report = run_batch(active, |(id, body)| async move {
            self.client
                .update_comment(&issue.repo, id, &format!("~~{body}~~"))
                .await
        })
        .await;
        let retired = report.into_result("retire resolution date comment")?;
        Ok(retired.into_iter().map(|(id, _)| id).collect())
    }

    /// Read the active resolution date, or compute a fresh one from the
    /// triage date (or creation date) plus the severity window.
    pub async fn get_resolution_date(
        &self,
        issue: &Issue,
        severity: &SeverityConfig,
    ) -> anyhow::Result<ResolutionLookup> {
        if let Some(record) = self.find_active_record(issue).await? {
            let resolution_date = parse_record_date(&record.body)?;
            debug!(
                issue = issue.number,
                comment = record.id,
                author = record.author.as_deref().unwrap_or("unknown"),
                %resolution_date,
                "using recorded resolution date"
            );
            return Ok(ResolutionLookup {
                resolution_date,
                existing_comment: Some(record.html_url),
            });
        }

        Ok(ResolutionLookup {
            resolution_date: calculate_resolution_date(issue, severity)?,
            existing_comment: None,
        })
    }

    /// Append the record for a freshly computed date. Returns the comment URL.
    ///
    /// Only call this when `get_resolution_date` found no active record.
    pub async fn add_resolution_date_comment(
        &self,
        issue: &Issue,
        date: NaiveDate,
    ) -> anyhow::Result<String> {
        let comment = self
            .append_record(issue, date)
            .await
            .with_context(|| format!("Failed to add resolution date to #{}", issue.number))?;
        Ok(comment.html_url)
    }

    pub async fn retire_resolution_date_comments(&self, issue: &Issue) -> anyhow::Result<usize> {
        let retired = self.retire_records(issue).await?;
        if !retired.is_empty() {
            debug!(issue = issue.number, comments = ?retired, "retired resolution date comments");
        }
        Ok(retired.len())
    }
}

fn is_active_record(comment: &Comment) -> bool {
    comment.body.starts_with(RESOLUTION_MARKER)
}

/// Newest active record; on equal timestamps the earliest in stream order wins.
fn latest_active(comments: Vec<Comment>) -> Option<Comment> {
    comments
        .into_iter()
        .filter(is_active_record)
        .fold(None, |best: Option<Comment>, c| match best {
            Some(b) if b.created_at >= c.created_at => Some(b),
            _ => Some(c),
        })
}

fn parse_record_date(body: &str) -> Result<NaiveDate, SlaError> {
    body.split_once(": ")
        .and_then(|(_, date)| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| SlaError::MalformedLedgerEntry(body.to_string()))
}

/// Triage date (or creation date) plus the severity window, in calendar days.
pub fn calculate_resolution_date(
    issue: &Issue,
    severity: &SeverityConfig,
) -> Result<NaiveDate, SlaError> {
    let triaged = issue.labels.iter().find_map(|l| match parse_label(&l.name) {
        LabelKind::TriageDate(raw) => Some(raw),
        _ => None,
    });
    let base = match triaged {
        Some(raw) => parse_triage_date(raw)?,
        None => issue.created_at.date_naive(),
    };

    TimeDelta::try_days(severity.resolution_days)
        .and_then(|window| base.checked_add_signed(window))
        .ok_or_else(|| SlaError::InvalidTriageDate(base.to_string()))
}

fn parse_triage_date(raw: &str) -> Result<NaiveDate, SlaError> {
    let value = raw.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|d| d.with_timezone(&Utc).date_naive())
        })
        .ok_or_else(|| SlaError::InvalidTriageDate(raw.to_string()))
}
