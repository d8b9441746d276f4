//! Ordered price history for one instrument.
//!
//! A `PriceSeries` is the only input shape the scoring engine accepts. Its
//! constructor enforces the ordering invariant: strictly increasing dates,
//! no duplicates, all prices finite.

use crate::domain::error::ScoringError;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone)]
pub struct PriceSeries {
    code: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(code: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, ScoringError> {
        let code = code.into();

        if let Some(bad) = bars.iter().find(|b| !b.is_well_formed()) {
            return Err(ScoringError::MalformedInput {
                code,
                reason: format!("non-numeric or negative value on {}", bad.date),
            });
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                let reason = if pair[1].date == pair[0].date {
                    format!("duplicate date {}", pair[1].date)
                } else {
                    format!("bars out of order at {}", pair[1].date)
                };
                return Err(ScoringError::MalformedInput { code, reason });
            }
        }

        Ok(Self { code, bars })
    }

    /// Keep only the most recent `max_bars` bars.
    pub fn tail(mut self, max_bars: usize) -> Self {
        if self.bars.len() > max_bars {
            let start = self.bars.len() - max_bars;
            self.bars.drain(..start);
        }
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
