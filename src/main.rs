// src/main.rs — agentdeck entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use agentdeck::api::{self, ApiState};
use agentdeck::infra::config::Config;
use agentdeck::infra::logger;
use agentdeck::overview::{self, DeckContext};

#[derive(Parser)]
#[command(name = "agentdeck", version, about = "Read-only operations dashboard for an autonomous agent workspace")]
struct Cli {
    /// Path to config.toml (defaults to ~/.agentdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard API (default)
    Serve {
        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Agent workspace root
        #[arg(short, long)]
        workspace: Option<PathBuf>,
        /// Directory holding the browser client bundle
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Print one overview document as JSON and exit
    Overview {
        /// Agent workspace root
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Respects RUST_LOG
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Overview { workspace }) => {
            if workspace.is_some() {
                config.workspace.root = workspace;
            }
            let ctx = DeckContext::new(&config);
            let overview = overview::build_overview(&ctx).await;
            println!("{}", serde_json::to_string_pretty(&overview)?);
            Ok(())
        }
        Some(Commands::Serve {
            port,
            workspace,
            static_dir,
        }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if workspace.is_some() {
                config.workspace.root = workspace;
            }
            if static_dir.is_some() {
                config.server.static_dir = static_dir;
            }
            serve(config).await
        }
        None => serve(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let ctx = DeckContext::new(&config);
    tracing::info!("workspace: {}", ctx.workspace.root().display());

    let state = ApiState { ctx: Arc::new(ctx) };
    api::start_server(&config.server, state).await
}
