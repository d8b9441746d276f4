//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation (divides by N, not N-1).
//! Default parameters: period=20, multiplier=2.0. Warmup: first (period-1)
//! bars are invalid.

use crate::domain::indicator::stddev::window_stats;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT: f64 = 2.0;

pub fn calculate_bollinger(bars: &[OhlcvBar], period: usize, mult: f64) -> IndicatorSeries {
    let indicator_type = IndicatorType::bollinger(period, mult);
    if period == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (valid, value) = match window_stats(bars, i, period) {
                Some((middle, stddev)) => (
                    true,
                    IndicatorValue::Bollinger {
                        upper: middle + mult * stddev,
                        middle,
                        lower: middle - mult * stddev,
                    },
                ),
                None => (
                    false,
                    IndicatorValue::Bollinger {
                        upper: 0.0,
                        middle: 0.0,
                        lower: 0.0,
                    },
                ),
            };
            IndicatorPoint {
                date: bar.date,
                valid,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
