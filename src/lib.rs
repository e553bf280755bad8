//! brickdeal - LEGO resale profitability analyzer
//!
//! Scores Dealabs LEGO deals against Vinted resale listings and turns the
//! spread into a 0-100 deal score with a buy/avoid recommendation.

pub mod analysis;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod dealabs;
pub mod format;
pub mod store;
pub mod text;
pub mod vinted;

pub use analysis::{AnalysisResult, Condition, MarketListing, Recommendation, SourceDeal};
pub use config::Config;
