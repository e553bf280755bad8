//! Data models for source deals, marketplace listings, and analysis results.
//!
//! Serialized field names are camelCase to stay compatible with the JSON
//! documents the store already holds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deal scraped from the deals aggregator (Dealabs).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDeal {
    /// LEGO set number, if one could be extracted
    pub set_number: Option<String>,
    /// Deal title
    pub title: String,
    /// Deal price; a deal without a price cannot be analyzed
    pub price: Option<f64>,
    /// Community temperature (vote heat)
    #[serde(default)]
    pub temperature: i32,
    /// Number of comments on the deal thread
    #[serde(default)]
    pub comments_count: u32,
    /// When the deal was posted
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    /// Whether shipping is free
    #[serde(default)]
    pub free_shipping: bool,
    /// Unique deal URL
    pub link: String,
    /// Deal image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Item condition on the marketplace, ordinal scale (lower is better).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Condition {
    #[default]
    Unknown,
    NewWithTag,
    NewWithoutTag,
    VeryGood,
    Good,
    Satisfactory,
}

impl Condition {
    /// Numeric code as stored in documents (0 = unknown, 1-5 ordinal).
    pub fn code(self) -> u8 {
        match self {
            Condition::Unknown => 0,
            Condition::NewWithTag => 1,
            Condition::NewWithoutTag => 2,
            Condition::VeryGood => 3,
            Condition::Good => 4,
            Condition::Satisfactory => 5,
        }
    }

    /// Maps a stored numeric code back to a condition.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Condition::NewWithTag,
            2 => Condition::NewWithoutTag,
            3 => Condition::VeryGood,
            4 => Condition::Good,
            5 => Condition::Satisfactory,
            _ => Condition::Unknown,
        }
    }

    /// Maps a Vinted condition label (French locale) to the ordinal scale.
    pub fn from_label(text: &str) -> Self {
        let label = text.to_lowercase();
        if label.contains("neuf avec étiquette") {
            Condition::NewWithTag
        } else if label.contains("neuf sans étiquette") {
            Condition::NewWithoutTag
        } else if label.contains("très bon état") {
            Condition::VeryGood
        } else if label.contains("bon état") {
            Condition::Good
        } else if label.contains("satisfaisant") {
            Condition::Satisfactory
        } else {
            Condition::Unknown
        }
    }

    /// New-with-tag or new-without-tag; only these enter the statistics.
    pub fn is_new(self) -> bool {
        matches!(self, Condition::NewWithTag | Condition::NewWithoutTag)
    }
}

impl From<u8> for Condition {
    fn from(code: u8) -> Self {
        Condition::from_code(code)
    }
}

impl From<Condition> for u8 {
    fn from(condition: Condition) -> Self {
        condition.code()
    }
}

/// A resale observation scraped from the marketplace (Vinted).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketListing {
    /// LEGO set number, if one could be extracted
    pub set_number: Option<String>,
    /// Listing title
    pub title: String,
    /// Asking price
    pub price: Option<f64>,
    /// Item condition
    #[serde(default)]
    pub condition: Condition,
    /// Number of users who favorited the listing
    #[serde(default)]
    pub favorites_count: u32,
    /// Unique listing URL
    pub link: String,
    /// Listing image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

impl MarketListing {
    /// True if the listing may enter price statistics: it has a usable
    /// price and is in new condition.
    pub fn is_eligible(&self) -> bool {
        matches!(self.price, Some(p) if p.is_finite() && p > 0.0) && self.condition.is_new()
    }
}

/// The six weighted sub-scores making up the deal score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// How cheap the deal is vs. the resale sample (max 15)
    pub percentile_score: u8,
    /// Net profit and ROI (max 25)
    pub profit_score: u8,
    /// Sample depth, price stability, price trend (max 20)
    pub market_score: u8,
    /// Deal heat, comments, freshness (max 15)
    pub deal_quality_score: u8,
    /// Favorites and condition of the resale sample (max 15)
    pub liquidity_score: u8,
    /// Price-to-minimum ratio and investment size (max 10)
    pub risk_score: u8,
}

impl ScoreBreakdown {
    /// Total deal score; always the plain sum of the six sub-scores.
    pub fn total(&self) -> u8 {
        self.percentile_score
            + self.profit_score
            + self.market_score
            + self.deal_quality_score
            + self.liquidity_score
            + self.risk_score
    }
}

/// Buy/avoid guidance derived from deal score and profit sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strongly Buy")]
    StronglyBuy,
    #[serde(rename = "Buy")]
    Buy,
    #[serde(rename = "Consider Buying")]
    ConsiderBuying,
    #[serde(rename = "Watch")]
    Watch,
    #[serde(rename = "Proceed with Caution")]
    ProceedWithCaution,
    #[serde(rename = "Avoid - Low Profitability or High Risk")]
    AvoidLowScore,
    #[serde(rename = "Avoid - Not Profitable")]
    NotProfitable,
    #[serde(rename = "Cannot Evaluate - Insufficient Data")]
    InsufficientData,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Recommendation::StronglyBuy => "Strongly Buy",
            Recommendation::Buy => "Buy",
            Recommendation::ConsiderBuying => "Consider Buying",
            Recommendation::Watch => "Watch",
            Recommendation::ProceedWithCaution => "Proceed with Caution",
            Recommendation::AvoidLowScore => "Avoid - Low Profitability or High Risk",
            Recommendation::NotProfitable => "Avoid - Not Profitable",
            Recommendation::InsufficientData => "Cannot Evaluate - Insufficient Data",
        };
        write!(f, "{}", label)
    }
}

/// Full profitability analysis for one source deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub source_deal: SourceDeal,
    /// Total candidate listings considered
    pub listings_count: usize,
    /// Listings that passed the eligibility filter (new condition, priced)
    pub new_condition_listings_count: usize,
    pub average_selling_price: Option<f64>,
    pub median_selling_price: Option<f64>,
    pub lower_quartile_price: Option<f64>,
    pub upper_quartile_price: Option<f64>,
    pub price_standard_deviation: Option<f64>,
    pub coefficient_of_variation: Option<f64>,
    /// Deal price as listed
    pub purchase_price: Option<f64>,
    /// Deal price plus shipping surcharge when shipping is not free
    pub purchase_price_with_shipping: Option<f64>,
    /// Gross spread: average resale price minus the listed deal price
    pub potential_profit: Option<f64>,
    /// ROI in percent; None when the purchase price is zero
    pub profit_percentage: Option<f64>,
    /// Resale proceeds after fees, minus the shipping-inclusive purchase price
    pub estimated_net_profit: Option<f64>,
    pub average_condition: Option<f64>,
    pub average_favorites: Option<f64>,
    /// Percentile rank of the deal price within the resale sample
    pub price_percentile: Option<f64>,
    /// Age of the source deal in whole days (0 if the posted date is unknown)
    pub source_deal_age: i64,
    pub deal_score: u8,
    pub score_breakdown: ScoreBreakdown,
    pub recommendation: Recommendation,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// The fixed zero-score result returned when there is no market data or
    /// the deal has no price. Not an error: "insufficient data" is a
    /// first-class outcome.
    pub fn insufficient_data(
        source_deal: SourceDeal,
        listings_count: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let purchase_price = source_deal.price;
        Self {
            source_deal,
            listings_count,
            new_condition_listings_count: 0,
            average_selling_price: None,
            median_selling_price: None,
            lower_quartile_price: None,
            upper_quartile_price: None,
            price_standard_deviation: None,
            coefficient_of_variation: None,
            purchase_price,
            purchase_price_with_shipping: None,
            potential_profit: None,
            profit_percentage: None,
            estimated_net_profit: None,
            average_condition: None,
            average_favorites: None,
            price_percentile: None,
            source_deal_age: 0,
            deal_score: 0,
            score_breakdown: ScoreBreakdown::default(),
            recommendation: Recommendation::InsufficientData,
            timestamp: now,
        }
    }
}
