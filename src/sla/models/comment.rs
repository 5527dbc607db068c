use chrono::{DateTime, Utc};

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// REST API database ID
    pub id: u64,
    pub author: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}
