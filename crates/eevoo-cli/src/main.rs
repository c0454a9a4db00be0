mod commands;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const ENV_FILE: &str = ".env";

#[derive(Parser)]
#[command(name = "eevoo", about = "Build and tag Docker images for Node.js apps")]
#[command(version)]
struct Cli {
    /// Print every docker command and step
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Container engine binary (default: docker, or `[docker] binary` in eevoo.toml)
    #[arg(long, global = true, env = "EEVOO_DOCKER")]
    docker: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, test, and tag the Node.js app in the current directory
    App {
        /// Also write the Dockerfile and .dockerignore used to the project
        #[arg(long = "gen")]
        generate: bool,
        /// Ask for confirmation at every step
        #[arg(long, short = 'i')]
        interactive: bool,
    },
    /// Build and tag the shared Node.js base image
    Node {
        /// Push every tag after tagging
        #[arg(long)]
        push: bool,
        /// Node.js version of the upstream image (default from eevoo.toml)
        #[arg(long)]
        node_version: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `.env` can set EEVOO_DOCKER.
    let env_file = Path::new(ENV_FILE);
    let env_loaded = if env_file.is_file() {
        dotenvy::from_path(env_file).context("failed to load .env")?;
        true
    } else {
        false
    };
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(loaded = env_loaded, "environment file");

    match cli.command {
        Commands::App {
            generate,
            interactive,
        } => commands::app(cli.docker, generate, interactive).await?,
        Commands::Node { push, node_version } => {
            commands::node(cli.docker, node_version, push).await?
        }
    }

    Ok(())
}
