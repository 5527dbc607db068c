//! Centralized reader for the environment variables sla-keeper consumes.
//!
//! Environment variable names are defined as private constants here;
//! external code accesses values through the `EnvVars` struct.

const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
const GITHUB_API_URL: &str = "GITHUB_API_URL";
const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
const GITHUB_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
const LOG: &str = "SLA_KEEPER_LOG";

/// Snapshot of the relevant environment variables at load time.
#[derive(Debug, Default)]
pub struct EnvVars {
    /// API token. When unset the token is taken from `gh auth token`.
    pub github_token: Option<String>,

    /// REST API root; set by Actions on GitHub Enterprise Server runners.
    pub github_api_url: Option<String>,

    /// `owner/name` of the repository the workflow runs in.
    pub github_repository: Option<String>,

    /// Path to the JSON payload of the triggering webhook event.
    pub github_event_path: Option<String>,

    /// `tracing` filter directives, e.g. "debug" or "sla_keeper=trace".
    pub log: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvVars {
    /// Read all relevant environment variables from the current process.
    pub fn load() -> Self {
        Self {
            github_token: non_empty_var(GITHUB_TOKEN),
            github_api_url: non_empty_var(GITHUB_API_URL),
            github_repository: non_empty_var(GITHUB_REPOSITORY),
            github_event_path: non_empty_var(GITHUB_EVENT_PATH),
            log: non_empty_var(LOG),
        }
    }
}
