//! Maps days remaining until the resolution date to a display bucket.
//!
//! Buckets are scanned in ascending order and the first one whose inclusive
//! upper bound covers the remaining days wins. A trailing bucket without an
//! upper bound catches everything beyond the last bound; without one, such
//! values are an error rather than a silently empty label.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::SlaError;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TimelineBucket {
    /// Inclusive upper bound in days. Omit on the last bucket to catch all larger values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<i64>,
    /// Text shown after `Fix timeline: `.
    pub text: String,
    /// Label color as 6-digit hex, without '#'.
    pub color: String,
}

impl TimelineBucket {
    fn bounded(up_to: i64, text: &str, color: &str) -> Self {
        Self {
            up_to: Some(up_to),
            text: text.to_string(),
            color: color.to_string(),
        }
    }

    fn covers(&self, days: i64) -> bool {
        self.up_to.is_none_or(|bound| days <= bound)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct TimelinePolicy(Vec<TimelineBucket>);

impl TimelinePolicy {
    pub fn bucket_for(&self, days_remaining: i64) -> Result<&TimelineBucket, SlaError> {
        self.0
            .iter()
            .find(|bucket| bucket.covers(days_remaining))
            .ok_or(SlaError::UndefinedBucket {
                days: days_remaining,
            })
    }

    pub fn buckets(&self) -> &[TimelineBucket] {
        &self.0
    }

    /// Reference buckets without the catch-all, i.e. undefined beyond 92 days.
    pub fn bounded_reference() -> Self {
        Self(vec![
            TimelineBucket::bounded(0, "Overdue", "b60205"),
            TimelineBucket::bounded(7, "<1 week", "b60205"),
            TimelineBucket::bounded(14, "<2 weeks", "d93f0b"),
            TimelineBucket::bounded(21, "3 weeks", "d93f0b"),
            TimelineBucket::bounded(31, "1 month", "fbca04"),
            TimelineBucket::bounded(61, "2 months", "32CD32"),
            TimelineBucket::bounded(92, "3 months", "0e8a16"),
        ])
    }
}

impl Default for TimelinePolicy {
    fn default() -> Self {
        let mut policy = Self::bounded_reference();
        policy.0.push(TimelineBucket {
            up_to: None,
            text: "3+ months".to_string(),
            color: "0e8a16".to_string(),
        });
        policy
    }
}
