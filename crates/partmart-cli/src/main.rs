mod catalog;
mod listings;

use clap::{Parser, Subcommand};
use partmart_core::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::listings::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "partmart")]
#[command(about = "Browse the car-parts marketplace from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List vehicle brands
    Brands,
    /// List models for a vehicle brand
    Models {
        /// Brand name; unknown brands list every model
        brand: String,
    },
    /// List governorates, the districts of a governorate, or the cities of a district
    Locations {
        #[arg(long)]
        governorate: Option<String>,
        #[arg(long)]
        district: Option<String>,
    },
    /// List part categories
    Categories,
    /// Fetch, filter and print listings
    Search(SearchArgs),
    /// Show one listing as JSON
    Show {
        /// Listing id
        id: String,
    },
    /// Check the API health endpoint
    Health,
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = partmart_core::load_app_config()?;
    init_tracing(&config)?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Brands) => catalog::run_brands(&config)?,
        Some(Commands::Models { brand }) => catalog::run_models(&config, &brand)?,
        Some(Commands::Locations {
            governorate,
            district,
        }) => catalog::run_locations(&config, governorate.as_deref(), district.as_deref())?,
        Some(Commands::Categories) => catalog::run_categories(),
        Some(Commands::Search(args)) => listings::run_search(&config, &args).await?,
        Some(Commands::Show { id }) => listings::run_show(&config, &id).await?,
        Some(Commands::Health) => listings::run_health(&config).await?,
        None => println!("no command given; run `partmart --help` for usage"),
    }

    Ok(())
}
