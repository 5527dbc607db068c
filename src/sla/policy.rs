//! Severity policy table: resolution window and color per severity tier.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::SlaError;

/// Resolution window and display color for one severity tier.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SeverityConfig {
    /// Calendar days between triage (or creation) and the resolution date.
    pub resolution_days: i64,
    /// Label color as 6-digit hex, without '#'.
    pub color: String,
}

/// Closed set of recognized severity tiers, keyed by label name (e.g. `SEV-0`).
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct SeverityPolicy(BTreeMap<String, SeverityConfig>);

impl SeverityPolicy {
    pub fn new(tiers: impl IntoIterator<Item = (String, SeverityConfig)>) -> Self {
        Self(tiers.into_iter().collect())
    }

    pub fn config_for(&self, tier: &str) -> Result<&SeverityConfig, SlaError> {
        self.0
            .get(tier)
            .ok_or_else(|| SlaError::UnknownSeverity(tier.to_string()))
    }

    pub fn tiers(&self) -> impl Iterator<Item = (&str, &SeverityConfig)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        let tier = |name: &str, days: i64, color: &str| {
            (
                name.to_string(),
                SeverityConfig {
                    resolution_days: days,
                    color: color.to_string(),
                },
            )
        };
        Self::new([
            tier("SEV-0", 10, "b60205"),
            tier("SEV-1", 20, "d93f0b"),
            tier("SEV-2", 30, "fbca04"),
            tier("SEV-3", 60, "0e8a16"),
        ])
    }
}
