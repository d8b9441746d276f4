//! Per-bar indicator snapshot used by the scoring engine.
//!
//! Runs every indicator the scoring rules read over one price history and
//! zips the results into a `BarIndicators` row per bar. Missing warm-up is
//! represented by `None`; computing the set never fails.

use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_macd, calculate_rsi, calculate_sma, macd, rsi,
    IndicatorPoint, IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub bb_period: usize,
    pub bb_mult: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: 5,
            sma_long: 25,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            rsi_period: rsi::DEFAULT_PERIOD,
            bb_period: bollinger::DEFAULT_PERIOD,
            bb_mult: bollinger::DEFAULT_MULT,
        }
    }
}

impl IndicatorParams {
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(self.sma_short),
            IndicatorType::Sma(self.sma_long),
            IndicatorType::Macd {
                fast: self.macd_fast,
                slow: self.macd_slow,
                signal: self.macd_signal,
            },
            IndicatorType::Rsi(self.rsi_period),
            IndicatorType::bollinger(self.bb_period, self.bb_mult),
        ]
    }
}

/// Indicator values for a single bar. `None` means "not available".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarIndicators {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_lower: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    rows: Vec<BarIndicators>,
}

impl IndicatorSet {
    pub fn from_rows(rows: Vec<BarIndicators>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BarIndicators> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[BarIndicators] {
        &self.rows
    }
}

/// Compute one indicator series per requested type, keyed by type.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::new();
    for indicator_type in types {
        if out.contains_key(indicator_type) {
            continue;
        }
        let series = match *indicator_type {
            IndicatorType::Sma(n) => calculate_sma(bars, n),
            IndicatorType::Rsi(n) => calculate_rsi(bars, n),
            IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
            IndicatorType::Bollinger { period, mult_bits } => {
                calculate_bollinger(bars, period, f64::from_bits(mult_bits))
            }
        };
        out.insert(indicator_type.clone(), series);
    }
    out
}

/// Build the per-bar indicator set for `bars`.
pub fn compute(bars: &[OhlcvBar], params: &IndicatorParams) -> IndicatorSet {
    let types = params.indicator_types();
    let series = compute_indicators(bars, &types);

    let column = |t: &IndicatorType, read: fn(&IndicatorPoint) -> Option<f64>| -> Vec<Option<f64>> {
        let values = series.get(t).map(|s| s.values.as_slice()).unwrap_or(&[]);
        (0..bars.len())
            .map(|i| values.get(i).and_then(read))
            .collect()
    };

    let sma_short = column(&types[0], IndicatorPoint::simple);
    let sma_long = column(&types[1], IndicatorPoint::simple);
    let macd_line = column(&types[2], IndicatorPoint::macd_line);
    let macd_signal = column(&types[2], IndicatorPoint::macd_signal);
    let rsi = column(&types[3], IndicatorPoint::simple);
    let bb_lower = column(&types[4], IndicatorPoint::bollinger_lower);

    let rows = (0..bars.len())
        .map(|i| BarIndicators {
            sma_short: sma_short[i],
            sma_long: sma_long[i],
            macd: macd_line[i],
            macd_signal: macd_signal[i],
            rsi: rsi[i],
            bb_lower: bb_lower[i],
        })
        .collect();

    IndicatorSet { rows }
}
