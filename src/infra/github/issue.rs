//! Issue operations.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::client::OctocrabClient;
use super::error::Result;
use crate::sla::models::{Issue, IssueState, Label, RepoRef};

/// Characters left as-is in a label name path segment.
pub(super) const LABEL_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Trait for issue operations.
#[async_trait::async_trait]
pub trait IssueClient: Send + Sync {
    /// List every open issue in the repository (all pages).
    async fn list_open_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>>;

    /// Add labels to an issue.
    async fn add_labels(&self, issue: &Issue, labels: &[String]) -> Result<()>;

    /// Remove a label from an issue.
    async fn remove_label(&self, issue: &Issue, label: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl IssueClient for OctocrabClient {
    async fn list_open_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>> {
        let first_page = self
            .client
            .issues(&repo.owner, &repo.name)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;
        let issues = self.client.all_pages(first_page).await?;

        Ok(issues
            .into_iter()
            .map(|issue| Issue {
                number: issue.number,
                repo: repo.clone(),
                state: match issue.state {
                    octocrab::models::IssueState::Open => IssueState::Open,
                    _ => IssueState::Closed,
                },
                labels: issue
                    .labels
                    .into_iter()
                    .map(|l| Label::new(l.name, l.color))
                    .collect(),
                created_at: issue.created_at,
                html_url: issue.html_url.to_string(),
                is_pull_request: issue.pull_request.is_some(),
            })
            .collect())
    }

    async fn add_labels(&self, issue: &Issue, labels: &[String]) -> Result<()> {
        self.client
            .issues(&issue.repo.owner, &issue.repo.name)
            .add_labels(issue.number, labels)
            .await?;
        Ok(())
    }

    async fn remove_label(&self, issue: &Issue, label: &str) -> Result<()> {
        // Fix-timeline names contain spaces and '<', so the segment is encoded here.
        let route = format!(
            "/repos/{}/{}/issues/{}/labels/{}",
            issue.repo.owner,
            issue.repo.name,
            issue.number,
            utf8_percent_encode(label, LABEL_SEGMENT)
        );
        let _response: serde_json::Value = self
            .client
            .delete(route, Option::<&()>::None)
            .await?;
        Ok(())
    }
}
