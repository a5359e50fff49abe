use std::time::Instant;

use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;

use vtex_orders_etl::config::SyncConfig;
use vtex_orders_etl::db::establish_connection_pool;
use vtex_orders_etl::repository::DieselRepository;
use vtex_orders_etl::services::sync::{SyncLock, next_run_delay, run_sync};
use vtex_orders_etl::vtex::VtexClient;

/// Pull new VTEX orders into the database on a fixed schedule.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run a single sync and exit instead of looping.
    #[arg(long)]
    once: bool,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let _lock = match SyncLock::acquire(&config.lock_path) {
        Ok(lock) => lock,
        Err(e) => {
            log::error!("Cannot start syncing: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let api = match VtexClient::new(&config.vtex) {
        Ok(api) => api,
        Err(e) => {
            log::error!("Failed to build the VTEX client: {e}");
            std::process::exit(1);
        }
    };

    loop {
        log::info!("Starting VTEX orders sync");
        let started = Instant::now();
        let outcome = run_sync(&repo, &api, Utc::now(), config.vtex.page_size);
        match &outcome {
            Ok(report) => log::info!(
                "Sync finished: {} orders inserted, {} order items inserted, {} failures",
                report.written.orders_inserted,
                report.written.items_inserted,
                report.written.failures()
            ),
            Err(e) => log::error!("Sync failed: {e}"),
        }

        if cli.once {
            if outcome.is_err() {
                std::process::exit(1);
            }
            break;
        }

        let delay = next_run_delay(config.interval, started.elapsed());
        log::info!("Next sync in {} seconds", delay.as_secs());
        std::thread::sleep(delay);
    }
}
