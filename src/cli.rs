// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the build, restart, delete, and serve subcommands.

use clap::{ArgAction, Parser, Subcommand};
use kaas_build::output::OutputMode;
use kaas_build::pipeline::DEFAULT_BRANCH;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kaas-build")]
#[command(about = "Build container images from git repositories and deploy them to Kubernetes")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (default: kaas.yml in the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Result format
    #[arg(long, value_enum, default_value_t = OutputMode::Normal, global = true)]
    pub output: OutputMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a repository's image and create its workload
    Build {
        /// Git repository URL (public HTTP(S) only)
        repo_url: String,

        /// Branch or tag to build
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Deploy descriptor path in the repository, or an inline document
        #[arg(short = 'c', long = "deploy-conf")]
        deploy_conf: Option<String>,

        /// Service descriptor path in the repository, or an inline document
        #[arg(short = 's', long = "service-conf")]
        service_conf: Option<String>,

        /// Build only; skip pushing to the registry
        #[arg(long)]
        no_push: bool,

        /// Namespace to deploy into (overrides settings)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Re-read a repository's deploy descriptor and patch an existing workload
    Restart {
        /// Workload name
        name: String,

        /// Git repository URL (public HTTP(S) only)
        repo_url: String,

        /// Branch or tag to read the descriptor from
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Deploy descriptor path in the repository, or an inline document
        #[arg(short = 'c', long = "deploy-conf")]
        deploy_conf: Option<String>,

        /// Namespace of the workload (overrides settings)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Delete a workload
    Delete {
        /// Workload name
        name: String,

        /// Namespace of the workload (overrides settings)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Run the HTTP build server
    Serve {
        /// Address to bind (overrides settings)
        #[arg(long)]
        bind: Option<IpAddr>,

        /// Port to listen on (overrides settings)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
