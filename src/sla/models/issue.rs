use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::sla::error::SlaError;

/// Repository an issue lives in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name` or an API URL ending in `/owner/name`.
    pub fn parse(raw: &str) -> Result<Self, SlaError> {
        let mut segments = raw.trim_end_matches('/').rsplit('/');
        match (segments.next(), segments.next()) {
            (Some(name), Some(owner)) if !name.is_empty() && !owner.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(SlaError::InvalidRepo(raw.to_string())),
        }
    }
}

impl TryFrom<String> for RepoRef {
    type Error = SlaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// An issue as seen by the SLA engine.
///
/// Deserializes directly from the REST/webhook issue payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(rename = "repository_url")]
    pub repo: RepoRef,
    pub state: IssueState,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub html_url: String,
    /// Pull requests show up in issue listings with a `pull_request` object.
    #[serde(default, rename = "pull_request", deserialize_with = "is_present")]
    pub is_pull_request: bool,
}

fn is_present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Option::<serde::de::IgnoredAny>::deserialize(deserializer).map(|v| v.is_some())
}

impl Issue {
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl Label {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}
