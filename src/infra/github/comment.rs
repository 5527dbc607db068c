//! Comment operations.

use super::client::OctocrabClient;
use super::error::Result;
use crate::sla::models::{Comment, Issue, RepoRef};

/// Trait for comment operations.
#[async_trait::async_trait]
pub trait CommentClient: Send + Sync {
    /// Get every comment on an issue, oldest first (all pages).
    async fn list_comments(&self, issue: &Issue) -> Result<Vec<Comment>>;

    /// Create a new comment on an issue.
    async fn create_comment(&self, issue: &Issue, body: &str) -> Result<Comment>;

    /// Replace the body of an existing comment.
    async fn update_comment(&self, repo: &RepoRef, comment_id: u64, body: &str) -> Result<()>;
}

fn convert_comment(comment: octocrab::models::issues::Comment) -> Comment {
    Comment {
        id: comment.id.0,
        author: Some(comment.user.login),
        body: comment.body.unwrap_or_default(),
        created_at: comment.created_at,
        html_url: comment.html_url.to_string(),
    }
}

#[async_trait::async_trait]
impl CommentClient for OctocrabClient {
    async fn list_comments(&self, issue: &Issue) -> Result<Vec<Comment>> {
        let first_page = self
            .client
            .issues(&issue.repo.owner, &issue.repo.name)
            .list_comments(issue.number)
            .per_page(100)
            .send()
            .await?;
        let comments = self.client.all_pages(first_page).await?;

        Ok(comments.into_iter().map(convert_comment).collect())
    }

    async fn create_comment(&self, issue: &Issue, body: &str) -> Result<Comment> {
        let comment = self
            .client
            .issues(&issue.repo.owner, &issue.repo.name)
            .create_comment(issue.number, body)
            .await?;

        Ok(convert_comment(comment))
    }

    async fn update_comment(&self, repo: &RepoRef, comment_id: u64, body: &str) -> Result<()> {
        // Use REST API: PATCH /repos/{owner}/{repo}/issues/comments/{comment_id}
        let route = format!(
            "/repos/{}/{}/issues/comments/{comment_id}",
            repo.owner, repo.name
        );
        let _response: serde_json::Value = self
            .client
            .patch(route, Some(&serde_json::json!({ "body": body })))
            .await?;
        Ok(())
    }
}
