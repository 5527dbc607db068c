use std::path::Path;

use clap::Subcommand;

use crate::shared::config::{Config, generate_schema, load_config};

/// Configuration management commands.
#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration as YAML
    Show,

    /// Print JSON Schema for the configuration file
    Schema,
}

impl ConfigCommands {
    pub fn run(&self, config_path: Option<&Path>) -> anyhow::Result<()> {
        match self {
            Self::Show => {
                let config = load_config(config_path)?;
                print!("{}", render_config(&config)?);
                Ok(())
            }
            Self::Schema => {
                let schema = generate_schema();
                let json = serde_json::to_string_pretty(&schema)?;
                println!("{json}");
                Ok(())
            }
        }
    }
}

fn render_config(config: &Config) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(config)?)
}
