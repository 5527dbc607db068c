use std::path::{Path, PathBuf};

use lazy_regex::regex_is_match;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sla::policy::SeverityPolicy;
use crate::sla::timeline::TimelinePolicy;

/// Directory searched for the config file when no path is given.
const DEFAULT_CONFIG_DIR: &str = ".github";

/// Top-level configuration for sla-keeper.
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Resolution window and color per severity label (default: SEV-0..SEV-3).
    #[serde(default)]
    pub severities: SeverityPolicy,

    /// Fix-timeline buckets, ascending by `up_to`.
    #[serde(default)]
    pub timeline: TimelinePolicy,

    /// Repositories whose latest release decides whether a fix has shipped.
    #[serde(default)]
    pub releases: ReleaseRepos,
}

/// Platform repositories for release correlation.
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReleaseRepos {
    /// Owner of both platform repositories (default: "MetaMask").
    #[serde(default = "default_release_owner")]
    #[schemars(default = "default_release_owner")]
    pub owner: String,

    /// Repository released by issues labelled `mobile`.
    #[serde(default = "default_mobile_repo")]
    #[schemars(default = "default_mobile_repo")]
    pub mobile: String,

    /// Repository released by issues labelled `extension`.
    #[serde(default = "default_extension_repo")]
    #[schemars(default = "default_extension_repo")]
    pub extension: String,
}

impl Default for ReleaseRepos {
    fn default() -> Self {
        Self {
            owner: default_release_owner(),
            mobile: default_mobile_repo(),
            extension: default_extension_repo(),
        }
    }
}

fn default_release_owner() -> String {
    "MetaMask".to_string()
}

fn default_mobile_repo() -> String {
    "metamask-mobile".to_string()
}

fn default_extension_repo() -> String {
    "metamask-extension".to_string()
}

impl Config {
    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.severities.is_empty() {
            return Err("severities must define at least one tier".to_string());
        }
        for (tier, config) in self.severities.tiers() {
            if config.resolution_days <= 0 {
                return Err(format!("{tier}: resolution_days must be positive"));
            }
            check_color(tier, &config.color)?;
        }

        let buckets = self.timeline.buckets();
        if buckets.is_empty() {
            return Err("timeline must define at least one bucket".to_string());
        }
        let mut previous: Option<i64> = None;
        for (i, bucket) in buckets.iter().enumerate() {
            check_color(&bucket.text, &bucket.color)?;
            match bucket.up_to {
                None if i + 1 != buckets.len() => {
                    return Err(format!(
                        "timeline bucket {:?}: only the last bucket may omit up_to",
                        bucket.text
                    ));
                }
                Some(bound) if previous.is_some_and(|p| bound <= p) => {
                    return Err(format!(
                        "timeline bucket {:?}: up_to must be strictly increasing",
                        bucket.text
                    ));
                }
                _ => previous = bucket.up_to,
            }
        }
        Ok(())
    }
}

fn check_color(owner: &str, color: &str) -> Result<(), String> {
    if regex_is_match!("^[0-9a-fA-F]{6}$", color) {
        Ok(())
    } else {
        Err(format!("{owner}: color {color:?} is not a 6-digit hex value"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Load configuration from an explicit path, or from `.github/sla-keeper.ya?ml`
/// in the working directory. Returns Config::default() if no file exists there.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            parse_config(&content, path)
        }
        None => load_config_from_dir(Path::new(DEFAULT_CONFIG_DIR)),
    }
}

/// Load configuration from a specific directory.
/// Searches for sla-keeper.yaml, then sla-keeper.yml in the given directory.
/// Returns Config::default() if neither file exists.
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    for filename in &["sla-keeper.yaml", "sla-keeper.yml"] {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }

    Ok(Config::default())
}

/// Parse and validate YAML content into Config.
fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate().map_err(|message| ConfigError::ParseError {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(config)
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}
