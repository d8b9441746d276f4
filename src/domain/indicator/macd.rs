//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line, seeded with the mean of the first
//! `signal` line values.
//!
//! The line is valid from bar `slow - 1`; the signal from bar
//! `slow - 1 + signal - 1` (33 for 12/26/9).

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    // Signal EMA runs only over the defined part of the line.
    let first_line = line.iter().position(Option::is_some);
    let mut signal: Vec<Option<f64>> = vec![None; bars.len()];
    if let Some(start) = first_line {
        let defined: Vec<f64> = line[start..].iter().map(|v| v.unwrap_or(0.0)).collect();
        for (offset, value) in ema_values(&defined, signal_period).into_iter().enumerate() {
            signal[start + offset] = value;
        }
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: line[i].is_some(),
            value: IndicatorValue::Macd {
                line: line[i].unwrap_or(0.0),
                signal: signal[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
