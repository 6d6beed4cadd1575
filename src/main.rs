use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ingot::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for ingot::AppCommand {
    fn from(cmd: Commands) -> ingot::AppCommand {
        match cmd {
            Commands::Collect => ingot::AppCommand::Collect,
            Commands::Cleanup => ingot::AppCommand::Cleanup,
            Commands::Status => ingot::AppCommand::Status,
            Commands::History { limit } => ingot::AppCommand::History { limit },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch spot prices and record a reading
    Collect,
    /// Remove past readings that are not peaks
    Cleanup,
    /// Display the latest prices and current peaks
    Status,
    /// Display recent readings
    History {
        /// Number of readings to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ingot::cli::setup::setup(),
        Some(cmd) => ingot::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
