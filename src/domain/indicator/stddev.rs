//! Rolling population standard deviation over n closing prices.
//!
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / n)
//! Warmup: first (n-1) bars have no window.

use crate::domain::ohlcv::OhlcvBar;

/// Mean and population standard deviation of the `period` closes ending at `end`.
pub(crate) fn window_stats(bars: &[OhlcvBar], end: usize, period: usize) -> Option<(f64, f64)> {
    if period == 0 || end + 1 < period || end >= bars.len() {
        return None;
    }
    let window = &bars[end + 1 - period..=end];
    let mean = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
    let variance = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    Some((mean, variance.sqrt()))
}
