pub mod analyzer;
pub mod filters;
pub mod models;
pub mod profit;
pub mod score;
pub mod stats;

pub use analyzer::{analyze, analyze_at};
pub use models::{
    AnalysisResult, Condition, MarketListing, Recommendation, ScoreBreakdown, SourceDeal,
};
