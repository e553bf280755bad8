//! Analysis orchestrator: composes eligibility filtering, statistics, the
//! profit model and the scoring rubric into one pure function.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::analysis::models::{AnalysisResult, MarketListing, SourceDeal};
use crate::analysis::profit;
use crate::analysis::score::{self, ScoreInputs};
use crate::analysis::stats::{self, round2};

/// Analyzes a source deal against candidate marketplace listings.
///
/// Reads the wall clock once for deal age and the result timestamp; use
/// [`analyze_at`] to pin the clock in tests.
pub fn analyze(source_deal: &SourceDeal, candidates: &[MarketListing]) -> AnalysisResult {
    analyze_at(source_deal, candidates, Utc::now())
}

/// Clock-injected variant of [`analyze`]. Pure function of its arguments.
pub fn analyze_at(
    source_deal: &SourceDeal,
    candidates: &[MarketListing],
    now: DateTime<Utc>,
) -> AnalysisResult {
    let eligible: Vec<&MarketListing> =
        candidates.iter().filter(|l| l.is_eligible()).collect();

    debug!(
        "{} of {} candidate listings are eligible for set {:?}",
        eligible.len(),
        candidates.len(),
        source_deal.set_number
    );

    // Missing deal price or no market data both short-circuit to the fixed
    // insufficient-data result; neither is an error.
    let source_price = source_deal.price.filter(|p| p.is_finite() && *p >= 0.0);
    let prices: Vec<f64> = eligible.iter().filter_map(|l| l.price).collect();

    let (Some(source_price), Some(price_stats)) = (source_price, stats::compute(&prices)) else {
        return AnalysisResult::insufficient_data(source_deal.clone(), candidates.len(), now);
    };

    let percentile = stats::percentile_rank(source_price, &prices);
    let estimate = profit::estimate(source_price, source_deal.free_shipping, price_stats.mean);

    let age_days = source_deal
        .posted_date
        .map(|posted| (now - posted).num_days().max(0))
        .unwrap_or(0);

    let eligible_count = eligible.len();
    let average_condition = eligible.iter().map(|l| l.condition.code() as f64).sum::<f64>()
        / eligible_count as f64;
    let average_favorites = eligible.iter().map(|l| l.favorites_count as f64).sum::<f64>()
        / eligible_count as f64;

    let breakdown = score::score(&ScoreInputs {
        percentile_rank: percentile,
        estimated_net_profit: estimate.estimated_net_profit,
        profit_percentage: estimate.profit_percentage,
        eligible_count,
        coefficient_of_variation: price_stats.coefficient_of_variation,
        average_price: price_stats.mean,
        upper_quartile: price_stats.upper_quartile,
        min_price: price_stats.min,
        purchase_price_with_shipping: estimate.purchase_price_with_shipping,
        temperature: source_deal.temperature,
        comments_count: source_deal.comments_count,
        age_days,
        average_favorites,
        average_condition,
    });
    let deal_score = breakdown.total();
    let recommendation = score::recommend(deal_score, estimate.estimated_net_profit);

    AnalysisResult {
        source_deal: source_deal.clone(),
        listings_count: candidates.len(),
        new_condition_listings_count: eligible_count,
        average_selling_price: Some(round2(price_stats.mean)),
        median_selling_price: Some(round2(price_stats.median)),
        lower_quartile_price: Some(round2(price_stats.lower_quartile)),
        upper_quartile_price: Some(round2(price_stats.upper_quartile)),
        price_standard_deviation: Some(round2(price_stats.std_dev)),
        coefficient_of_variation: Some(round2(price_stats.coefficient_of_variation)),
        purchase_price: Some(round2(source_price)),
        purchase_price_with_shipping: Some(round2(estimate.purchase_price_with_shipping)),
        potential_profit: Some(round2(estimate.potential_profit)),
        profit_percentage: estimate.profit_percentage.map(round2),
        estimated_net_profit: Some(round2(estimate.estimated_net_profit)),
        average_condition: Some(round2(average_condition)),
        average_favorites: Some(round2(average_favorites)),
        price_percentile: Some(round2(percentile)),
        source_deal_age: age_days,
        deal_score,
        score_breakdown: breakdown,
        recommendation,
        timestamp: now,
    }
}
