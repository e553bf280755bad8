//! The 100-point deal scoring rubric.
//!
//! Six weighted buckets (15/25/20/15/15/10) computed by descending threshold
//! checks; every threshold is an inclusive lower bound unless a comment says
//! otherwise. The tables are hard-coded business rules and the stored scores
//! depend on them, so changes here invalidate historical comparisons.

use crate::analysis::models::{Recommendation, ScoreBreakdown};

/// Raw metrics feeding the rubric, already computed by the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    /// Percentile rank of the deal price within the resale sample
    pub percentile_rank: f64,
    pub estimated_net_profit: f64,
    /// None when ROI is undefined (zero purchase price); scores as the lowest tier
    pub profit_percentage: Option<f64>,
    pub eligible_count: usize,
    pub coefficient_of_variation: f64,
    pub average_price: f64,
    pub upper_quartile: f64,
    pub min_price: f64,
    pub purchase_price_with_shipping: f64,
    pub temperature: i32,
    pub comments_count: u32,
    pub age_days: i64,
    pub average_favorites: f64,
    pub average_condition: f64,
}

/// Applies the rubric. Pure and total: any finite input maps to a breakdown.
pub fn score(inputs: &ScoreInputs) -> ScoreBreakdown {
    ScoreBreakdown {
        percentile_score: percentile_points(inputs.percentile_rank),
        profit_score: net_profit_points(inputs.estimated_net_profit)
            + roi_points(inputs.profit_percentage),
        market_score: listing_count_points(inputs.eligible_count)
            + stability_points(inputs.coefficient_of_variation)
            + trend_points(inputs.upper_quartile, inputs.average_price),
        deal_quality_score: temperature_points(inputs.temperature, inputs.age_days)
            + comment_points(inputs.comments_count)
            + freshness_points(inputs.age_days),
        liquidity_score: favorites_points(inputs.average_favorites)
            + condition_points(inputs.average_condition),
        risk_score: price_floor_points(inputs.average_price, inputs.min_price)
            + investment_points(inputs.purchase_price_with_shipping),
    }
}

/// Derives the recommendation label. A non-positive net profit always wins
/// over the score.
pub fn recommend(total: u8, estimated_net_profit: f64) -> Recommendation {
    if estimated_net_profit <= 0.0 {
        return Recommendation::NotProfitable;
    }
    match total {
        80..=u8::MAX => Recommendation::StronglyBuy,
        70..=79 => Recommendation::Buy,
        60..=69 => Recommendation::ConsiderBuying,
        50..=59 => Recommendation::Watch,
        40..=49 => Recommendation::ProceedWithCaution,
        _ => Recommendation::AvoidLowScore,
    }
}

// Percentile bucket, max 15. Lower rank means the deal undercuts more of the
// resale sample.
fn percentile_points(rank: f64) -> u8 {
    if rank <= 5.0 {
        15
    } else if rank <= 10.0 {
        12
    } else if rank <= 20.0 {
        9
    } else if rank <= 30.0 {
        6
    } else if rank <= 40.0 {
        3
    } else {
        0
    }
}

// Net profit half of the profit bucket, max 15.
fn net_profit_points(net: f64) -> u8 {
    if net >= 30.0 {
        15
    } else if net >= 20.0 {
        12
    } else if net >= 10.0 {
        8
    } else if net >= 5.0 {
        4
    } else if net > 0.0 {
        // strict: exactly zero earns nothing
        2
    } else {
        0
    }
}

// ROI half of the profit bucket, max 10.
fn roi_points(roi: Option<f64>) -> u8 {
    let Some(roi) = roi else { return 0 };
    if roi >= 100.0 {
        10
    } else if roi >= 50.0 {
        8
    } else if roi >= 30.0 {
        6
    } else if roi >= 20.0 {
        4
    } else if roi >= 10.0 {
        2
    } else {
        0
    }
}

// Sample depth, max 8.
fn listing_count_points(count: usize) -> u8 {
    if count >= 15 {
        8
    } else if count >= 10 {
        6
    } else if count >= 5 {
        4
    } else if count >= 3 {
        2
    } else {
        1
    }
}

// Price stability via coefficient of variation, max 8. Lower is better.
fn stability_points(cv: f64) -> u8 {
    if cv <= 10.0 {
        8
    } else if cv <= 15.0 {
        6
    } else if cv <= 20.0 {
        4
    } else if cv <= 30.0 {
        2
    } else if cv <= 40.0 {
        1
    } else {
        0
    }
}

// Upside trend: how far the upper quartile sits above the average, max 4.
fn trend_points(upper_quartile: f64, average: f64) -> u8 {
    if average <= 0.0 {
        return 0;
    }
    let ratio = upper_quartile / average;
    if ratio >= 1.3 {
        4
    } else if ratio >= 1.2 {
        3
    } else if ratio >= 1.1 {
        2
    } else if ratio >= 1.05 {
        1
    } else {
        0
    }
}

// Community heat decayed by deal age: temperature / (1 + age/7), max 7.
fn temperature_points(temperature: i32, age_days: i64) -> u8 {
    let decayed = temperature as f64 / (1.0 + age_days as f64 / 7.0);
    if decayed >= 500.0 {
        7
    } else if decayed >= 300.0 {
        5
    } else if decayed >= 200.0 {
        4
    } else if decayed >= 100.0 {
        3
    } else if decayed >= 50.0 {
        2
    } else {
        0
    }
}

// Comment activity, max 4.
fn comment_points(comments: u32) -> u8 {
    if comments >= 20 {
        4
    } else if comments >= 10 {
        3
    } else if comments >= 5 {
        2
    } else if comments >= 2 {
        1
    } else {
        0
    }
}

// Deal freshness by age in days, max 4.
fn freshness_points(age_days: i64) -> u8 {
    if age_days <= 1 {
        4
    } else if age_days <= 2 {
        3
    } else if age_days <= 7 {
        2
    } else if age_days <= 14 {
        1
    } else {
        0
    }
}

// Average favorites across the eligible sample, max 8.
fn favorites_points(average_favorites: f64) -> u8 {
    if average_favorites >= 15.0 {
        8
    } else if average_favorites >= 10.0 {
        6
    } else if average_favorites >= 5.0 {
        4
    } else if average_favorites >= 2.0 {
        2
    } else {
        1
    }
}

// Average condition code, max 7. Lower code means closer to new-with-tag.
fn condition_points(average_condition: f64) -> u8 {
    if average_condition <= 1.2 {
        7
    } else if average_condition <= 1.5 {
        6
    } else if average_condition <= 1.8 {
        5
    } else {
        4
    }
}

// Distance of the average above the sample minimum, max 5. A high ratio
// means even the floor leaves margin.
fn price_floor_points(average: f64, min: f64) -> u8 {
    if min <= 0.0 {
        return 1;
    }
    let ratio = average / min;
    if ratio >= 1.5 {
        5
    } else if ratio >= 1.3 {
        4
    } else if ratio >= 1.2 {
        3
    } else if ratio >= 1.1 {
        2
    } else {
        1
    }
}

// Capital at risk, max 5. Smaller outlay scores higher.
fn investment_points(purchase_price: f64) -> u8 {
    if purchase_price <= 20.0 {
        5
    } else if purchase_price <= 50.0 {
        4
    } else if purchase_price <= 100.0 {
        3
    } else if purchase_price <= 200.0 {
        2
    } else {
        1
    }
}
