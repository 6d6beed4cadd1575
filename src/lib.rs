pub mod cleanup;
pub mod cli;
pub mod collect;
pub mod core;
pub mod providers;
pub mod store;

use anyhow::Result;
use tracing::debug;

use crate::collect::CollectOutcome;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::AppConfig;
use crate::providers::SpotPageProvider;
use crate::store::HistoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Collect,
    Cleanup,
    Status,
    History { limit: usize },
}

fn format_price(price: Option<f64>) -> String {
    price.map_or("N/A".to_string(), |p| format!("{p:.2}"))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = HistoryStore::new(config.history_path()?);
    let clock = SystemClock;

    match command {
        AppCommand::Collect => {
            if config.providers.is_empty() {
                anyhow::bail!(
                    "No spot pages configured. Run `ingot setup` and edit the config file"
                );
            }
            let provider = SpotPageProvider::new(&config.providers);
            let spinner = cli::ui::new_spinner("Fetching spot prices...");
            let outcome = collect::collect_once(&store, &provider, &clock).await;
            spinner.finish_and_clear();

            match outcome? {
                CollectOutcome::Recorded(record) => {
                    println!(
                        "Recorded {} {}: gold {} silver {} (value {:.2} {})",
                        record.date,
                        record.time,
                        format_price(record.gold_price),
                        format_price(record.silver_price),
                        record.portfolio_value,
                        config.currency,
                    );
                    if record.daily_peak {
                        println!("New daily peak");
                    }
                }
                CollectOutcome::NoData => {
                    println!("No prices available, nothing recorded");
                }
            }
            Ok(())
        }
        AppCommand::Cleanup => {
            let stats = cleanup::cleanup_once(&store, &clock)?;
            println!(
                "Removed {} of {} readings, {} kept",
                stats.removed_count, stats.initial_count, stats.final_count
            );
            if stats.anomalies > 0 {
                println!("Kept {} readings with unexpected dates", stats.anomalies);
            }
            Ok(())
        }
        AppCommand::Status => {
            let history = store.load();
            cli::status::run(&history, &config, clock.now())
        }
        AppCommand::History { limit } => {
            let history = store.load();
            cli::history::run(&history, &config, limit)
        }
    }
}
