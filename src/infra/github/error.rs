//! GitHub API error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Failed to get GitHub token: {0}")]
    TokenError(String),

    #[error("{}", format_octocrab_error(.0))]
    ApiError(#[from] octocrab::Error),

    /// Status-only failure raised by the in-memory tracker.
    #[cfg(test)]
    #[error("GitHub API error: {message} (HTTP {status})")]
    Status { status: u16, message: String },
}

impl GitHubError {
    /// HTTP status of the failed request, if the error came from the API.
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::ApiError(err) => octocrab_status(err),
            #[cfg(test)]
            GitHubError::Status { status, .. } => Some(*status),
            GitHubError::TokenError(_) => None,
        }
    }
}

pub type Result<T> = anyhow::Result<T>;

/// Format octocrab::Error to extract detailed error information from GitHub API responses.
fn format_octocrab_error(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let mut msg = format!(
                "GitHub API error: {} (HTTP {})",
                source.message,
                source.status_code.as_u16()
            );

            if let Some(errors) = &source.errors {
                msg.push_str(&format_error_details(errors));
            }

            msg
        }
        _ => format!("GitHub API error: {err}"),
    }
}

fn octocrab_status(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Returns the HTTP status carried by an error chain, if any.
///
/// Errors reach callers either as a bare `octocrab::Error` (converted by `?`)
/// or wrapped in `GitHubError`; both are checked.
pub fn status_of(err: &anyhow::Error) -> Option<u16> {
    if let Some(gh) = err.downcast_ref::<GitHubError>() {
        return gh.status();
    }
    err.downcast_ref::<octocrab::Error>().and_then(octocrab_status)
}

/// 404: the target is already gone.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    status_of(err) == Some(404)
}

/// 422: GitHub's answer for "already exists" on labels.
pub fn is_unprocessable(err: &anyhow::Error) -> bool {
    status_of(err) == Some(422)
}

/// Format error details from GitHub API errors array.
/// Returns a formatted string like "[field1 is code1, field2 is code2]" or empty string.
fn format_error_details(errors: &[serde_json::Value]) -> String {
    let error_details: Vec<String> = errors
        .iter()
        .filter_map(|e| {
            let field = e.get("field").and_then(|v| v.as_str());
            let code = e.get("code").and_then(|v| v.as_str());
            match (field, code) {
                (Some(f), Some(c)) => Some(format!("{f} is {c}")),
                (Some(f), None) => Some(f.to_string()),
                (None, Some(c)) => Some(c.to_string()),
                (None, None) => None,
            }
        })
        .collect();

    if error_details.is_empty() {
        String::new()
    } else {
        format!(" [{}]", error_details.join(", "))
    }
}
