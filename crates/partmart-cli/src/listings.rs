//! Commands that talk to the parts API.

use std::sync::Mutex;

use clap::Args;
use partmart_client::{refresh_feed, FeedState, ListingFeed, PartsClient, PartsQuery};
use partmart_core::{AppConfig, FilterState, Product};

/// Filters for `search`. Listings are fetched once and filtered locally.
#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Free-text search over name, description, brand and model
    #[arg(long)]
    pub query: Option<String>,
    /// Category id (see `partmart categories`)
    #[arg(long)]
    pub category: Option<String>,
    /// District or city of the listing
    #[arg(long)]
    pub district: Option<String>,
    /// Vehicle brand
    #[arg(long)]
    pub brand: Option<String>,
    /// Vehicle model; requires --brand
    #[arg(long)]
    pub model: Option<String>,
    /// Maximum number of listings to fetch
    #[arg(long, default_value = "50")]
    pub limit: u32,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub(crate) fn filter_state(&self) -> FilterState {
        let mut filter = FilterState::new();
        if let Some(query) = &self.query {
            filter = filter.with_search(query.as_str());
        }
        if let Some(category) = &self.category {
            filter = filter.with_category(category.as_str());
        }
        if let Some(district) = &self.district {
            filter = filter.with_district(district.as_str());
        }
        if let Some(brand) = &self.brand {
            filter.set_brand(brand.as_str());
        }
        if let Some(model) = &self.model {
            filter.set_model(model.as_str());
        }
        filter
    }
}

/// Fetch listings, apply the filters, and print the matches.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the listings cannot be
/// fetched, or JSON output fails to serialize.
pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let client = PartsClient::from_app_config(config)?;
    let query = PartsQuery::default().with_limit(args.limit);

    let filter = args.filter_state();
    if args.model.is_some() && filter.brand().is_empty() {
        tracing::warn!("--model ignored without --brand");
    }

    let feed = Mutex::new(ListingFeed::new());
    refresh_feed(&feed, &client, &query).await;
    let feed = feed.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);

    if let FeedState::Degraded { reason, .. } = feed.state() {
        anyhow::bail!("listings unavailable: {reason}");
    }

    let visible = feed.state().visible(&filter);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("no listings match the given filters");
        return Ok(());
    }
    print_table(&visible);
    Ok(())
}

fn print_table(products: &[&Product]) {
    println!(
        "{:<26}{:>12}  {:<18}{:<14}{:<12}{:<14}NAME",
        "ID", "PRICE", "CONDITION", "BRAND", "MODEL", "DISTRICT"
    );
    for product in products {
        let district = if product.seller_district.is_empty() {
            &product.seller_city
        } else {
            &product.seller_district
        };
        println!(
            "{:<26}{:>12.0}  {:<18}{:<14}{:<12}{:<14}{}",
            product.id,
            product.price,
            product.condition.label(),
            product.brand,
            product.vehicle_model(),
            district,
            product.part_name
        );
    }
}

/// Print one listing, normalized for the details screen, as JSON.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched or serialized.
pub(crate) async fn run_show(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let client = PartsClient::from_app_config(config)?;
    let (product, related) = client.fetch_product(id).await?;
    println!("{}", serde_json::to_string_pretty(&product)?);
    tracing::info!(id, related = related.len(), "related listings available");
    Ok(())
}

/// Print the API health response.
///
/// # Errors
///
/// Returns an error if the health endpoint cannot be reached.
pub(crate) async fn run_health(config: &AppConfig) -> anyhow::Result<()> {
    let client = PartsClient::from_app_config(config)?;
    let body = client.health().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
