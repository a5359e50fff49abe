use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;

use vtex_orders_etl::config::ImportConfig;
use vtex_orders_etl::db::establish_connection_pool;
use vtex_orders_etl::repository::DieselRepository;
use vtex_orders_etl::services::import::{SellerMapping, import_directory};

/// Import exported VTEX order spreadsheets from a directory.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory holding the CSV and workbook exports.
    #[arg(short, long, env = "IMPORT_DIRECTORY")]
    directory: PathBuf,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    let config = match ImportConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
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
    let sellers = SellerMapping::new(config.seller_name, config.seller_code);

    if let Err(e) = import_directory(&repo, &cli.directory, &sellers) {
        log::error!("Import failed: {e}");
        std::process::exit(1);
    }
}
