use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "citypulse", version, about = "CityPulse event discovery CLI")]
struct Cli {
    /// Act as this user for saved events (defaults to session.user in config)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and filter a city's events
    Events(commands::events::EventsArgs),
    /// Map an event and the places around it
    Map(commands::map::MapArgs),
    /// Saved events for the signed-in user
    Saved {
        #[command(subcommand)]
        action: commands::saved::SavedAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr, filtered by CITYPULSE_LOG (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("CITYPULSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Events(args) => runtime.block_on(commands::events::run(args)),
        Commands::Map(args) => runtime.block_on(commands::map::run(args)),
        Commands::Saved { action } => runtime.block_on(commands::saved::run(action, cli.user)),
        Commands::Config { action } => commands::config::run(action),
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
