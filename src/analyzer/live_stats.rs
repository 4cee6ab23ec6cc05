use crate::model::{LiveStats, StabilityLabel};
use crate::normalizer::is_valid_price;

/// Calculates min, max, rounded mean, population standard deviation and the
/// coefficient of variation of the current prices.
///
/// Invalid prices (zero, negative, non-finite) are excluded first. Returns
/// `None` when nothing is left; the caller shows the stats as unavailable.
pub fn compute_live_stats(prices: &[f64]) -> Option<LiveStats> {
    let prices: Vec<f64> = prices.iter().copied().filter(|p| is_valid_price(*p)).collect();
    if prices.is_empty() {
        return None;
    }

    let count = prices.len() as f64;
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = crate::utils::round_half_up(prices.iter().sum::<f64>() / count);

    // Deviation is measured from the rounded mean shown on the card.
    let centre = mean as f64;
    let std_dev = (prices.iter().map(|p| (p - centre).powi(2)).sum::<f64>() / count).sqrt();
    let cv = if mean == 0 { 0.0 } else { std_dev / centre };

    Some(LiveStats {
        min,
        max,
        mean,
        std_dev,
        coefficient_of_variation: cv,
        stability: StabilityLabel::from_cv(cv),
    })
}
