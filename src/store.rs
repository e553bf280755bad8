//! JSON file store for scraped deals, listings, and analysis history.
//!
//! Documents live in three files under the data directory: `deals.json`,
//! `listings.json`, and `analyses.json`. Deals and listings are upserted
//! by their unique link; analyses are append-only so each set keeps an
//! audit trail of past runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::analysis::{AnalysisResult, MarketListing, SourceDeal};

const DEALS_FILE: &str = "deals.json";
const LISTINGS_FILE: &str = "listings.json";
const ANALYSES_FILE: &str = "analyses.json";

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Sort order for browsing stored analyses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DealSort {
    /// Cheapest source deal first.
    #[default]
    Price,
    /// Highest deal score first.
    Score,
    /// Most commented source deal first.
    Comments,
}

impl std::str::FromStr for DealSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "price" => Ok(DealSort::Price),
            "score" => Ok(DealSort::Score),
            "comments" => Ok(DealSort::Comments),
            _ => Err(format!("Unknown sort: {}. Use: price, score, comments", s)),
        }
    }
}

/// File-backed document store rooted at a data directory.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Opens the store, creating the data directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    /// Upserts deals keyed by link. Returns the total stored count.
    pub fn upsert_deals(&self, new_deals: &[SourceDeal]) -> Result<usize, StoreError> {
        let mut deals: Vec<SourceDeal> = self.read_vec(DEALS_FILE)?;
        for deal in new_deals {
            match deals.iter_mut().find(|d| d.link == deal.link) {
                Some(existing) => *existing = deal.clone(),
                None => deals.push(deal.clone()),
            }
        }
        self.write_vec(DEALS_FILE, &deals)?;
        debug!("Stored {} deals", deals.len());
        Ok(deals.len())
    }

    /// Upserts marketplace listings keyed by link. Returns the total stored count.
    pub fn upsert_listings(&self, new_listings: &[MarketListing]) -> Result<usize, StoreError> {
        let mut listings: Vec<MarketListing> = self.read_vec(LISTINGS_FILE)?;
        for listing in new_listings {
            match listings.iter_mut().find(|l| l.link == listing.link) {
                Some(existing) => *existing = listing.clone(),
                None => listings.push(listing.clone()),
            }
        }
        self.write_vec(LISTINGS_FILE, &listings)?;
        debug!("Stored {} listings", listings.len());
        Ok(listings.len())
    }

    /// All stored deals for a set number.
    pub fn deals_for_set(&self, set_number: &str) -> Result<Vec<SourceDeal>, StoreError> {
        let deals: Vec<SourceDeal> = self.read_vec(DEALS_FILE)?;
        Ok(deals.into_iter().filter(|d| d.set_number.as_deref() == Some(set_number)).collect())
    }

    /// All stored listings for a set number.
    pub fn listings_for_set(&self, set_number: &str) -> Result<Vec<MarketListing>, StoreError> {
        let listings: Vec<MarketListing> = self.read_vec(LISTINGS_FILE)?;
        Ok(listings.into_iter().filter(|l| l.set_number.as_deref() == Some(set_number)).collect())
    }

    /// Appends an analysis to the history. Past analyses are never
    /// overwritten.
    pub fn save_analysis(&self, analysis: &AnalysisResult) -> Result<(), StoreError> {
        let mut analyses: Vec<AnalysisResult> = self.read_vec(ANALYSES_FILE)?;
        analyses.push(analysis.clone());
        self.write_vec(ANALYSES_FILE, &analyses)
    }

    /// Analysis history for a set number, oldest first.
    pub fn history(&self, set_number: &str) -> Result<Vec<AnalysisResult>, StoreError> {
        let analyses: Vec<AnalysisResult> = self.read_vec(ANALYSES_FILE)?;
        Ok(analyses
            .into_iter()
            .filter(|a| a.source_deal.set_number.as_deref() == Some(set_number))
            .collect())
    }

    /// The latest analysis per set, sorted and limited for browsing.
    pub fn latest_analyses(
        &self,
        sort: DealSort,
        limit: usize,
    ) -> Result<Vec<AnalysisResult>, StoreError> {
        let analyses: Vec<AnalysisResult> = self.read_vec(ANALYSES_FILE)?;

        // history is append-only, so the last entry per set is the latest
        let mut latest: Vec<AnalysisResult> = Vec::new();
        for analysis in analyses {
            let key = analysis.source_deal.set_number.clone();
            match latest.iter_mut().find(|a| a.source_deal.set_number == key) {
                Some(existing) => *existing = analysis,
                None => latest.push(analysis),
            }
        }

        match sort {
            DealSort::Price => latest.sort_by(|a, b| {
                let pa = a.source_deal.price.unwrap_or(f64::INFINITY);
                let pb = b.source_deal.price.unwrap_or(f64::INFINITY);
                pa.total_cmp(&pb)
            }),
            DealSort::Score => latest.sort_by(|a, b| b.deal_score.cmp(&a.deal_score)),
            DealSort::Comments => latest
                .sort_by(|a, b| b.source_deal.comments_count.cmp(&a.source_deal.comments_count)),
        }

        latest.truncate(limit);
        Ok(latest)
    }

    fn read_vec<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|source| StoreError::Io { path: path.clone(), source })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt { path, source })
    }

    fn write_vec<T: Serialize>(&self, name: &str, items: &[T]) -> Result<(), StoreError> {
        let path = self.dir.join(name);
        let content = serde_json::to_string_pretty(items)
            .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?;
        fs::write(&path, content).map_err(|source| StoreError::Io { path, source })
    }
}
