//! Deals browsing command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::format::Formatter;
use crate::store::{DealSort, Store};

/// Default number of analyses shown when browsing.
pub const DEFAULT_LIMIT: usize = 12;

/// Lists the latest stored analysis per set.
pub struct DealsCommand {
    config: Config,
}

impl DealsCommand {
    /// Creates a new deals command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the listing and returns formatted output.
    pub fn execute(&self, sort: DealSort, limit: usize) -> Result<String> {
        let store =
            Store::open(self.config.resolve_data_dir()).context("Failed to open data store")?;
        self.execute_with_store(&store, sort, limit)
    }

    /// Executes the listing with a provided store (for testing).
    pub fn execute_with_store(
        &self,
        store: &Store,
        sort: DealSort,
        limit: usize,
    ) -> Result<String> {
        let analyses = store.latest_analyses(sort, limit)?;
        info!("Listing {} analyses (sort: {:?})", analyses.len(), sort);

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_analyses(&analyses))
    }
}
