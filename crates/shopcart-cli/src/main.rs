mod cart;
mod db;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopcart-cli")]
#[command(about = "Shopcart catalog and cart administration")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Inspect shopping carts
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert the product catalog file into the database
    Seed {
        /// Catalog file to load instead of `SHOPCART_CATALOG_PATH`
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum CartCommands {
    /// Print a cart with its priced lines and totals
    Summary {
        /// Cart id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("shopcart-cli: run with --help to list commands");
        return Ok(());
    };

    let config = shopcart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = shopcart_db::PoolConfig::from_app_config(&config);
    let pool = shopcart_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => db::run_ping(&pool).await,
        Commands::Db {
            command: DbCommands::Migrate,
        } => db::run_migrate(&pool).await,
        Commands::Db {
            command: DbCommands::Seed { path },
        } => {
            let path = path.unwrap_or_else(|| config.catalog_path.clone());
            db::run_seed(&pool, &path).await
        }
        Commands::Cart {
            command: CartCommands::Summary { id },
        } => cart::run_summary(pool, id).await,
    }
}
