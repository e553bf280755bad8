//! Descriptive statistics over resale price samples.
//!
//! The index conventions here are deliberate and load-bearing: the median is
//! the lower-middle element for even-sized samples, and quartiles use floor
//! indices. Stored documents and score thresholds depend on these exact
//! values, so they must not be "corrected" to interpolated definitions.

/// Distribution summary of a non-empty price sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Computes distribution statistics; returns None for an empty sample.
pub fn compute(prices: &[f64]) -> Option<PriceStats> {
    if prices.is_empty() {
        return None;
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = sorted[n / 2];

    // floor(n * 0.25) and floor(n * 0.75), exact in integer arithmetic;
    // fall back to min/max if the index is ever out of bounds
    let lower_quartile = sorted.get(n / 4).copied().unwrap_or(sorted[0]);
    let upper_quartile = sorted.get(n * 3 / 4).copied().unwrap_or(sorted[n - 1]);

    // population standard deviation, not sample
    let variance = sorted.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();

    let coefficient_of_variation = if mean != 0.0 { 100.0 * std_dev / mean } else { 0.0 };

    Some(PriceStats {
        mean,
        median,
        lower_quartile,
        upper_quartile,
        std_dev,
        coefficient_of_variation,
        min: sorted[0],
        max: sorted[n - 1],
        count: n,
    })
}

/// Percentile rank of `value` within the sample: the share of elements
/// strictly below it, expressed 0-100. Ties do not advance the rank.
pub fn percentile_rank(value: f64, prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let below = prices.iter().filter(|&&p| p < value).count();
    100.0 * below as f64 / prices.len() as f64
}

/// Rounds to 2 decimal places for reporting; computation stays full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
