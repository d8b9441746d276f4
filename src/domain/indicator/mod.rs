//! Technical indicator implementations.
//!
//! Every indicator returns an `IndicatorSeries` with one `IndicatorPoint` per
//! input bar. Bars inside the warm-up window carry `valid == false`; callers
//! read values through [`IndicatorPoint::simple`] and friends, which map
//! invalid points to `None`.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::calculate_bollinger;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    pub fn simple(&self) -> Option<f64> {
        match self.value {
            IndicatorValue::Simple(v) if self.valid => Some(v),
            _ => None,
        }
    }

    /// MACD line, available once the slow EMA has warmed up.
    pub fn macd_line(&self) -> Option<f64> {
        match self.value {
            IndicatorValue::Macd { line, .. } if self.valid => Some(line),
            _ => None,
        }
    }

    /// MACD signal line, available once the signal EMA has warmed up as well.
    pub fn macd_signal(&self) -> Option<f64> {
        match self.value {
            IndicatorValue::Macd { signal, .. } if self.valid => signal,
            _ => None,
        }
    }

    pub fn bollinger_lower(&self) -> Option<f64> {
        match self.value {
            IndicatorValue::Bollinger { lower, .. } if self.valid => Some(lower),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: Option<f64>,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    /// The multiplier is stored as `f64::to_bits` so the type can key a map
    /// without losing precision.
    Bollinger { period: usize, mult_bits: u64 },
}

impl IndicatorType {
    pub fn bollinger(period: usize, mult: f64) -> Self {
        IndicatorType::Bollinger {
            period,
            mult_bits: mult.to_bits(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger { period, mult_bits } => {
                write!(f, "BOLLINGER({},{})", period, f64::from_bits(*mult_bits))
            }
        }
    }
}
