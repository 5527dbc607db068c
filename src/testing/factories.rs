//! Test factories for creating test data with sensible defaults.
//!
//! Use `*_with()` variants to customize specific fields.
//!
//! # Example
//! ```ignore
//! use crate::testing::factories::{issue_with, issue_with_labels, utc};
//!
//! let i = issue_with(|i| {
//!     i.number = 42;
//!     i.created_at = utc("2024-01-01T00:00:00Z");
//! });
//! let sev = issue_with_labels(&["SEV-1", "mobile"]);
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::sla::models::{Comment, Issue, IssueState, Label, RepoRef};

// =============================================================================
// Time helpers
// =============================================================================

/// Parse an RFC 3339 timestamp.
pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Parse a `YYYY-MM-DD` date.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// =============================================================================
// Issue factories
// =============================================================================

/// Create an open Issue in owner/repo with default test values.
pub fn issue() -> Issue {
    Issue {
        number: 1,
        repo: RepoRef::new("owner", "repo"),
        state: IssueState::Open,
        labels: vec![],
        created_at: utc("2024-01-01T00:00:00Z"),
        html_url: "https://github.com/owner/repo/issues/1".to_string(),
        is_pull_request: false,
    }
}

/// Create an Issue with customizations applied via closure.
pub fn issue_with(f: impl FnOnce(&mut Issue)) -> Issue {
    let mut i = issue();
    f(&mut i);
    i
}

/// Create a default Issue carrying the given labels.
pub fn issue_with_labels(names: &[&str]) -> Issue {
    issue_with(|i| i.labels = labels(names))
}

// =============================================================================
// Comment factories
// =============================================================================

/// Create a Comment with default test values.
pub fn comment() -> Comment {
    Comment {
        id: 123,
        author: Some("github-actions[bot]".to_string()),
        body: "Test comment".to_string(),
        created_at: utc("2024-01-02T00:00:00Z"),
        html_url: "https://github.com/owner/repo/issues/1#issuecomment-123".to_string(),
    }
}

/// Create a Comment with customizations applied via closure.
pub fn comment_with(f: impl FnOnce(&mut Comment)) -> Comment {
    let mut c = comment();
    f(&mut c);
    c
}

// =============================================================================
// Helper factories
// =============================================================================

/// Create multiple labels from a slice of names.
pub fn labels(names: &[&str]) -> Vec<Label> {
    names.iter().map(|n| Label::new(*n, "ededed")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_defaults() {
        let i = issue();
        assert_eq!(i.number, 1);
        assert_eq!(i.repo.to_string(), "owner/repo");
        assert!(i.is_open());
    }

    #[test]
    fn test_issue_with_labels() {
        let i = issue_with_labels(&["SEV-1", "mobile"]);
        assert_eq!(i.labels.len(), 2);
        assert!(i.has_label("mobile"));
    }

    #[test]
    fn test_comment_with_customization() {
        let c = comment_with(|c| c.body = "Resolution Date: 2024-01-21".to_string());
        assert_eq!(c.id, 123);
        assert_eq!(c.body, "Resolution Date: 2024-01-21");
    }
}
