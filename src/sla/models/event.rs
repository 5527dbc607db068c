use serde::Deserialize;

use super::issue::{Issue, Label};

/// The subset of an `issues` webhook payload the label trigger needs.
///
/// Read from the file at `GITHUB_EVENT_PATH` in Actions runs.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEvent {
    pub action: String,
    /// Absent for actions that do not concern a single label.
    #[serde(default)]
    pub label: Option<Label>,
    pub issue: Issue,
}

impl LabelEvent {
    pub fn label_name(&self) -> &str {
        self.label.as_ref().map_or("", |l| l.name.as_str())
    }
}
