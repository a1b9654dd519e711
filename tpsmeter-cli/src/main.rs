use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

use config::ConfigLoader;

#[derive(Parser)]
#[command(name = "tpsmeter", about = "Measure tokens per second of LLM providers and models")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive test form (default)
    Form(commands::form::FormArgs),
    /// Run a test non-interactively
    Run(commands::run::RunArgs),
    /// Browse providers and models
    Models(commands::models::ModelsArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    // Logs go to stderr; stdout carries the response and --json output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load()?;

    match cli.command {
        None => commands::form::run(commands::form::FormArgs::default(), &config).await,
        Some(Commands::Form(args)) => commands::form::run(args, &config).await,
        Some(Commands::Run(args)) => commands::run::run(args, &config).await,
        Some(Commands::Models(args)) => commands::models::run(args),
        Some(Commands::Config(args)) => commands::config::run(args, &config),
    }
}
