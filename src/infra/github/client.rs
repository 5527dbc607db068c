//! GitHub API client implementation using octocrab.

use std::process::Command;

use anyhow::Context;

use super::error::{GitHubError, Result};
use crate::shared::env_var::EnvVars;

/// Production implementation using octocrab.
pub struct OctocrabClient {
    pub(crate) client: octocrab::Octocrab,
}

impl OctocrabClient {
    /// Create a client authenticated with `GITHUB_TOKEN`, or with
    /// `gh auth token` when the variable is not set. `GITHUB_API_URL`
    /// overrides the API root.
    pub fn from_env(env: &EnvVars) -> Result<Self> {
        let token = match &env.github_token {
            Some(token) => token.clone(),
            None => get_gh_token()?,
        };
        if let Some(base_url) = &env.github_api_url {
            return Self::with_base_url(base_url, &token);
        }
        let client = octocrab::Octocrab::builder()
            .personal_token(token)
            .build()
            .context("Failed to build octocrab client")?;
        Ok(Self { client })
    }

    /// Create a client pointed at a custom API root (GitHub Enterprise or a test server).
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        let client = octocrab::Octocrab::builder()
            .base_uri(base_url)
            .context("Invalid GitHub API base URL")?
            .personal_token(token.to_string())
            .build()
            .context("Failed to build octocrab client")?;
        Ok(Self { client })
    }
}

/// Get GitHub token from `gh auth token` command.
/// This reuses the authentication from GitHub CLI.
fn get_gh_token() -> Result<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("Failed to run gh auth token")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitHubError::TokenError(format!("gh auth token failed: {stderr}")).into());
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(
            GitHubError::TokenError("gh auth token returned empty token".to_string()).into(),
        );
    }

    Ok(token)
}
