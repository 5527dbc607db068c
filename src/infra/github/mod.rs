//! GitHub API client module using octocrab.
//!
//! Each capability the SLA engine needs is a small trait, all implemented by
//! `OctocrabClient`. `Tracker` bundles them so the engine can take one handle.

mod client;
mod comment;
pub(crate) mod error;
mod issue;
mod label;
#[cfg(test)]
mod mock;
mod release;

pub use client::OctocrabClient;
pub use comment::CommentClient;
pub use error::{is_not_found, is_unprocessable};
pub use issue::IssueClient;
pub use label::LabelClient;
#[cfg(test)]
pub use mock::GitHubMockServer;
pub use release::ReleaseClient;

/// Everything the SLA engine consumes from the issue tracker.
pub trait Tracker: IssueClient + CommentClient + LabelClient + ReleaseClient {}

impl<T> Tracker for T where T: IssueClient + CommentClient + LabelClient + ReleaseClient {}
