//! History command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::format::Formatter;
use crate::store::Store;

/// Shows the full analysis history for one set.
pub struct HistoryCommand {
    config: Config,
}

impl HistoryCommand {
    /// Creates a new history command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the history lookup and returns formatted output.
    pub fn execute(&self, set_number: &str) -> Result<String> {
        let store =
            Store::open(self.config.resolve_data_dir()).context("Failed to open data store")?;
        self.execute_with_store(&store, set_number)
    }

    /// Executes the history lookup with a provided store (for testing).
    pub fn execute_with_store(&self, store: &Store, set_number: &str) -> Result<String> {
        let analyses = store.history(set_number)?;
        info!("Found {} past analyses for set {}", analyses.len(), set_number);

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_analyses(&analyses))
    }
}
