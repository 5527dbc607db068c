//! Decides whether the release an issue is waiting on has already shipped.

use std::cmp::Ordering;

use tracing::info;

use super::error::SlaError;
use super::labels::{LabelKind, RELEASED_LABEL, TargetPlatform, parse_label};
use super::models::Issue;
use crate::infra::github::{IssueClient, ReleaseClient};
use crate::shared::config::ReleaseRepos;

/// Release-related facts carried by an issue's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseState {
    pub target: Option<TargetPlatform>,
    pub declared_release: Option<String>,
    pub already_released: bool,
}

impl ReleaseState {
    /// Single pass over the labels. Both targets at once is rejected.
    pub fn from_issue(issue: &Issue) -> Result<Self, SlaError> {
        let mut state = Self::default();
        let mut mobile = false;
        let mut extension = false;

        for label in &issue.labels {
            match parse_label(&label.name) {
                LabelKind::ReleaseVersion(version) => {
                    state.declared_release = Some(version.to_string());
                }
                LabelKind::Released => state.already_released = true,
                LabelKind::Target(TargetPlatform::Mobile) => mobile = true,
                LabelKind::Target(TargetPlatform::Extension) => extension = true,
                _ => {}
            }
        }

        state.target = match (mobile, extension) {
            (true, true) => return Err(SlaError::ConflictingTargets(issue.number)),
            (true, false) => Some(TargetPlatform::Mobile),
            (false, true) => Some(TargetPlatform::Extension),
            (false, false) => None,
        };
        Ok(state)
    }
}

/// What the orchestrator needs from the release check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCheck {
    pub released: bool,
    pub release: Option<String>,
}

/// Compare the declared release with the platform's latest published tag and
/// attach `Released` when the published one is strictly newer.
///
/// The returned flags reflect the labels as they were on entry.
pub async fn check_release<C>(
    client: &C,
    issue: &Issue,
    repos: &ReleaseRepos,
) -> anyhow::Result<ReleaseCheck>
where
    C: IssueClient + ReleaseClient + ?Sized,
{
    let state = ReleaseState::from_issue(issue)?;

    if let (false, Some(target), Some(declared)) = (
        state.already_released,
        state.target,
        state.declared_release.as_deref(),
    ) {
        let platform_repo = match target {
            TargetPlatform::Mobile => &repos.mobile,
            TargetPlatform::Extension => &repos.extension,
        };
        let tag = client
            .latest_release_tag(&repos.owner, platform_repo)
            .await?;

        if is_newer(&tag, declared) {
            info!(
                issue = issue.number,
                declared = %declared,
                tag = %tag,
                "published release is newer, marking as released"
            );
            client
                .add_labels(issue, &[RELEASED_LABEL.to_string()])
                .await?;
        }
    }

    Ok(ReleaseCheck {
        released: state.already_released,
        release: state.declared_release,
    })
}

/// True if `published` is a strictly later version than `declared`.
pub fn is_newer(published: &str, declared: &str) -> bool {
    compare_versions(strip_prefix(published), strip_prefix(declared)) == Ordering::Greater
}

fn strip_prefix(version: &str) -> &str {
    let version = version.trim();
    version
        .strip_prefix(['v', 'V'])
        .unwrap_or(version)
}

/// Dot-separated comparison: numeric components compare as numbers, anything
/// else lexicographically. Missing trailing components count as "0".
fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let (x, y) = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (x, y) => (x.unwrap_or("0"), y.unwrap_or("0")),
        };
        let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => x.cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}
