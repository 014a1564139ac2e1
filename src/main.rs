// ABOUTME: Entry point for the kaas-build CLI application.
// ABOUTME: Parses arguments, sets up logging, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::build::BuildArgs;
use commands::restart::RestartArgs;
use kaas_build::config::Settings;
use kaas_build::error::Result;
use kaas_build::output::Output;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v/-vv pick the level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output);
    let reporter = Output::new(cli.output);

    if let Err(e) = run(cli, output).await {
        reporter.error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) => Settings::load(path),
        None => Settings::discover(&env::current_dir()?),
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Build {
            repo_url,
            branch,
            deploy_conf,
            service_conf,
            no_push,
            namespace,
        } => {
            let args = BuildArgs {
                repo_url,
                branch,
                deploy_conf,
                service_conf,
                no_push,
                namespace,
            };
            commands::build(settings, args, output).await
        }
        Commands::Restart {
            name,
            repo_url,
            branch,
            deploy_conf,
            namespace,
        } => {
            let args = RestartArgs {
                name,
                repo_url,
                branch,
                deploy_conf,
                namespace,
            };
            commands::restart(settings, args, output).await
        }
        Commands::Delete { name, namespace } => {
            commands::delete(settings, name, namespace, output).await
        }
        Commands::Serve { bind, port } => commands::serve(settings, bind, port, output).await,
    }
}
