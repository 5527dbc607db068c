mod cli;
mod commands;
mod infra;
mod shared;
mod sla;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use shared::env_var::EnvVars;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        config,
        log_format,
        command,
    } = Cli::parse();

    let env = EnvVars::load();
    shared::logging::init(log_format, env.log.as_deref());

    match command {
        Commands::Sweep(args) => commands::sweep::run(&args, config.as_deref(), &env).await?,
        Commands::Labeled(args) => commands::labeled::run(&args, config.as_deref(), &env).await?,
        Commands::Config(config_cmd) => config_cmd.run(config.as_deref())?,
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sla-keeper",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
