//! Release metadata.

use super::client::OctocrabClient;
use super::error::Result;

#[async_trait::async_trait]
pub trait ReleaseClient: Send + Sync {
    /// Tag name of the latest published release, e.g. `v7.12.0`.
    async fn latest_release_tag(&self, owner: &str, repo: &str) -> Result<String>;
}

#[async_trait::async_trait]
impl ReleaseClient for OctocrabClient {
    async fn latest_release_tag(&self, owner: &str, repo: &str) -> Result<String> {
        let release = self.client.repos(owner, repo).releases().get_latest().await?;
        Ok(release.tag_name)
    }
}
