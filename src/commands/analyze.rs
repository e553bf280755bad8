//! Analyze command implementation.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::analysis::{self, filters, MarketListing, SourceDeal};
use crate::catalog;
use crate::config::Config;
use crate::dealabs::{self, DealSource, DealabsClient};
use crate::format::Formatter;
use crate::store::Store;
use crate::vinted::{self, MarketSource, VintedClient};

/// Runs the full scrape-and-analyze pipeline for one deal or set.
pub struct AnalyzeCommand {
    config: Config,
}

impl AnalyzeCommand {
    /// Creates a new analyze command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the analysis and returns formatted output.
    pub async fn execute(&self, input: &str) -> Result<String> {
        let deal_source =
            DealabsClient::new(&self.config).context("Failed to create Dealabs client")?;
        let market_source =
            VintedClient::new(&self.config).context("Failed to create Vinted client")?;
        let store =
            Store::open(self.config.resolve_data_dir()).context("Failed to open data store")?;

        self.execute_with_sources(&deal_source, &market_source, &store, input).await
    }

    /// Executes the analysis with provided sources and store (for testing).
    pub async fn execute_with_sources(
        &self,
        deal_source: &impl DealSource,
        market_source: &impl MarketSource,
        store: &Store,
        input: &str,
    ) -> Result<String> {
        let now = Utc::now();

        let deals: Vec<SourceDeal> = if is_deal_url(input) {
            info!("Fetching deal thread: {}", input);
            let html = deal_source.thread(input).await?;
            dealabs::parse_thread(&html, input).into_iter().collect()
        } else {
            info!("Searching deals for: {}", input);
            let html = deal_source.search(input).await?;
            dealabs::parse_search(&html, now)
        };

        if deals.is_empty() {
            bail!("No LEGO deals found for '{}'", input);
        }

        let stored = store.upsert_deals(&deals)?;
        debug!("{} deals in store after upsert", stored);

        let Some(set_number) = deals
            .iter()
            .find_map(|d| d.set_number.clone())
            .or_else(|| catalog::extract_set_number(input, input))
        else {
            bail!("Could not determine a LEGO set number from '{}'", input);
        };
        info!("Analyzing set {}", set_number);

        let html = market_source.search(&set_number).await?;
        let mut listings = vinted::parse_search(&html, Some(&set_number));
        listings.truncate(self.config.max_listings);
        store.upsert_listings(&listings)?;

        let stored_deals = store.deals_for_set(&set_number)?;
        let stored_listings = store.listings_for_set(&set_number)?;

        let Some(source_deal) = cheapest_deal(&stored_deals) else {
            bail!("No stored deal for set {}", set_number);
        };

        let candidates: Vec<MarketListing> = stored_listings
            .into_iter()
            .filter(|l| filters::is_relevant(&l.title, &set_number))
            .collect();
        debug!("{} relevant listings for set {}", candidates.len(), set_number);

        let analysis = analysis::analyze(&source_deal, &candidates);
        store.save_analysis(&analysis)?;

        info!(
            "Set {} scored {}/100 ({})",
            set_number, analysis.deal_score, analysis.recommendation
        );

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_analysis(&analysis))
    }
}

/// The cheapest priced deal for the set, falling back to the first deal when
/// none carries a price.
fn cheapest_deal(deals: &[SourceDeal]) -> Option<SourceDeal> {
    deals
        .iter()
        .min_by(|a, b| {
            let pa = a.price.filter(|p| p.is_finite()).unwrap_or(f64::INFINITY);
            let pb = b.price.filter(|p| p.is_finite()).unwrap_or(f64::INFINITY);
            pa.total_cmp(&pb)
        })
        .cloned()
}

fn is_deal_url(input: &str) -> bool {
    input.contains("dealabs.com") || input.starts_with("/bons-plans/")
}
