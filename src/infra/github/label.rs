//! Repository label definitions.

use super::client::OctocrabClient;
use super::error::Result;
use crate::sla::models::RepoRef;

#[async_trait::async_trait]
pub trait LabelClient: Send + Sync {
    /// Define a new label in the repository. Fails with HTTP 422 if it already exists.
    async fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl LabelClient for OctocrabClient {
    async fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<()> {
        self.client
            .issues(&repo.owner, &repo.name)
            .create_label(name, color, "")
            .await?;
        Ok(())
    }
}
