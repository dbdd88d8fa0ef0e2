mod cli;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use thoughtlog::config::ThoughtlogConfig;

#[derive(Parser)]
#[command(name = "thoughtlog", version, about = "Session-scoped thought journal MCP server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport)
    Serve,
    /// List sessions, most recently modified first
    List,
    /// Print every thought in a session
    View {
        /// Session name, e.g. thesis:NVDA:ai_dominance
        session: String,
    },
    /// Keyword search in one session, or across all sessions
    Search {
        query: String,
        /// Restrict the search to this session
        #[arg(long)]
        session: Option<String>,
    },
    /// Show session metadata
    Info { session: String },
    /// Delete sessions not modified for a number of days
    Cleanup {
        /// Defaults to maintenance.max_age_days from config
        #[arg(long)]
        max_age_days: Option<u64>,
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = ThoughtlogConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Serve => server::serve_stdio(config).await,
        Command::List => cli::list::list(&config).await,
        Command::View { session } => cli::view::view(&config, &session).await,
        Command::Search { query, session } => {
            cli::search::search(&config, &query, session.as_deref()).await
        }
        Command::Info { session } => cli::info::info(&config, &session).await,
        Command::Cleanup {
            max_age_days,
            dry_run,
        } => {
            let days = max_age_days.unwrap_or(config.maintenance.max_age_days);
            cli::cleanup::cleanup(&config, days, dry_run).await
        }
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "fatal error");
    }
    result
}
