//! CLI command implementations.

pub mod analyze;
pub mod deals;
pub mod history;

pub use analyze::AnalyzeCommand;
pub use deals::DealsCommand;
pub use history::HistoryCommand;
