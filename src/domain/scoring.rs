//! Signal scoring engine.
//!
//! Turns one instrument's price history into a bounded integer score with
//! attributed reasons. Eight independent rules are evaluated against the
//! latest bar, the bar before it and a trailing close window:
//!
//! | # | Rule            | Fires when                                  | Points                          |
//! |---|-----------------|---------------------------------------------|---------------------------------|
//! | 1 | Golden cross    | short SMA crosses above long SMA            | clamp(gap/long, 0, 0.05) × 300  |
//! | 2 | MACD cross      | MACD crosses above its signal               | clamp(macd-signal, 0, 0.5) × 30 |
//! | 3 | Volume rise     | volume above previous bar                   | min((v/pv - 1) × 40, 20)        |
//! | 4 | Oversold RSI    | RSI < 40                                    | 10 below 30, else 5             |
//! | 5 | Below BB lower  | close under the lower Bollinger band        | clamp(gap/band, 0, 0.03) × 300  |
//! | 6 | Window high     | close above the prior 7 closes              | +5                              |
//! | 7 | Window low      | close below the prior 7 closes              | -10                             |
//! | 8 | Market bonus    | always                                      | +5                              |
//!
//! The score is the plain sum; nothing short-circuits. Scaled points are
//! rounded with the configured [`RoundingRule`].

use crate::domain::error::ScoringError;
use crate::domain::indicator_set::{self, BarIndicators, IndicatorParams, IndicatorSet};
use crate::domain::price_series::PriceSeries;
use crate::domain::reason::{Reason, RuleKind, ScoreResult};
use std::str::FromStr;

pub const MIN_BARS: usize = 30;
pub const BREAKOUT_WINDOW: usize = 7;
pub const MARKET_BONUS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingRule {
    /// Banker's rounding: 2.5 -> 2, 3.5 -> 4.
    #[default]
    HalfEven,
    /// 2.5 -> 3.
    HalfUp,
}

impl RoundingRule {
    pub fn apply(self, value: f64) -> i64 {
        match self {
            RoundingRule::HalfEven => value.round_ties_even() as i64,
            RoundingRule::HalfUp => (value + 0.5).floor() as i64,
        }
    }
}

impl FromStr for RoundingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "half_even" | "even" | "bankers" => Ok(RoundingRule::HalfEven),
            "half_up" | "up" => Ok(RoundingRule::HalfUp),
            other => Err(format!("unknown rounding rule '{other}' (expected half_even or half_up)")),
        }
    }
}

/// A capped, linearly scaled contribution: `round(clamp(raw, 0, cap) * scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledPoints {
    pub cap: f64,
    pub scale: f64,
}

impl ScaledPoints {
    pub fn points(&self, raw: f64, rounding: RoundingRule) -> i64 {
        rounding.apply(raw.clamp(0.0, self.cap) * self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub min_bars: usize,
    pub indicators: IndicatorParams,
    pub breakout_window: usize,
    pub rounding: RoundingRule,
    pub golden_cross: ScaledPoints,
    pub macd_cross: ScaledPoints,
    pub volume_scale: f64,
    pub volume_cap: f64,
    pub rsi_weak: f64,
    pub rsi_strong: f64,
    pub rsi_weak_points: i64,
    pub rsi_strong_points: i64,
    pub bollinger: ScaledPoints,
    pub high_points: i64,
    pub low_points: i64,
    pub market_bonus: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_bars: MIN_BARS,
            indicators: IndicatorParams::default(),
            breakout_window: BREAKOUT_WINDOW,
            rounding: RoundingRule::HalfEven,
            golden_cross: ScaledPoints {
                cap: 0.05,
                scale: 300.0,
            },
            macd_cross: ScaledPoints {
                cap: 0.5,
                scale: 30.0,
            },
            volume_scale: 40.0,
            volume_cap: 20.0,
            rsi_weak: 40.0,
            rsi_strong: 30.0,
            rsi_weak_points: 5,
            rsi_strong_points: 10,
            bollinger: ScaledPoints {
                cap: 0.03,
                scale: 300.0,
            },
            high_points: 5,
            low_points: -10,
            market_bonus: MARKET_BONUS,
        }
    }
}

/// What the rules read from a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInputs {
    pub close: f64,
    pub volume: i64,
    pub indicators: BarIndicators,
}

/// Score a price series, computing its indicators first.
pub fn score(series: &PriceSeries, config: &ScoringConfig) -> Result<ScoreResult, ScoringError> {
    check_length(series, config)?;
    let indicators = indicator_set::compute(series.bars(), &config.indicators);
    score_with_indicators(series, &indicators, config)
}

/// Score a price series against an already computed indicator set.
pub fn score_with_indicators(
    series: &PriceSeries,
    indicators: &IndicatorSet,
    config: &ScoringConfig,
) -> Result<ScoreResult, ScoringError> {
    if indicators.len() != series.len() {
        return Err(ScoringError::MalformedInput {
            code: series.code().to_string(),
            reason: format!(
                "indicator rows ({}) do not match bar count ({})",
                indicators.len(),
                series.len()
            ),
        });
    }
    check_length(series, config)?;

    let bars = series.bars();
    let last = bars.len() - 1;
    let inputs = |i: usize| RuleInputs {
        close: bars[i].close,
        volume: bars[i].volume,
        indicators: indicators.rows()[i],
    };
    let latest = inputs(last);
    let prev = inputs(last - 1);

    for (label, row) in [("latest", &latest), ("previous", &prev)] {
        if row.indicators.sma_short.is_none() || row.indicators.sma_long.is_none() {
            return Err(insufficient(
                series,
                config,
                format!("moving averages unavailable at {label} bar"),
            ));
        }
    }

    let trailing: Vec<f64> = bars[last - config.breakout_window..last]
        .iter()
        .map(|b| b.close)
        .collect();

    log_unavailable(series.code(), &latest, &prev);

    let reasons = evaluate_rules(&latest, &prev, &trailing, config);
    let result = ScoreResult::from_reasons(series.code(), reasons);
    tracing::debug!(
        code = result.code(),
        score = result.score(),
        reasons = ?result.reason_tags(),
        "scored"
    );
    Ok(result)
}

/// Evaluate all rules in their fixed order.
///
/// `trailing_closes` are the closes of the bars strictly before `latest`.
/// A rule whose indicator is unavailable does not fire.
pub fn evaluate_rules(
    latest: &RuleInputs,
    prev: &RuleInputs,
    trailing_closes: &[f64],
    config: &ScoringConfig,
) -> Vec<Reason> {
    let rounding = config.rounding;
    let (now, before) = (&latest.indicators, &prev.indicators);
    let mut reasons = Vec::with_capacity(RuleKind::ALL.len());

    if let Some((short, long)) = crossed_above(
        (before.sma_short, before.sma_long),
        (now.sma_short, now.sma_long),
    ) {
        let pts = config.golden_cross.points((short - long) / long, rounding);
        reasons.push(Reason::rule(RuleKind::GoldenCross, pts));
    }

    if let Some((line, signal)) = crossed_above(
        (before.macd, before.macd_signal),
        (now.macd, now.macd_signal),
    ) {
        let pts = config.macd_cross.points(line - signal, rounding);
        reasons.push(Reason::rule(RuleKind::MacdCross, pts));
    }

    if latest.volume > prev.volume {
        let raw = if prev.volume > 0 {
            (latest.volume as f64 / prev.volume as f64 - 1.0) * config.volume_scale
        } else {
            config.volume_cap
        };
        let pts = rounding.apply(raw.clamp(0.0, config.volume_cap));
        reasons.push(Reason::rule(RuleKind::VolumeRise, pts));
    }

    if let Some(rsi) = now.rsi {
        if rsi < config.rsi_weak {
            let pts = if rsi < config.rsi_strong {
                config.rsi_strong_points
            } else {
                config.rsi_weak_points
            };
            reasons.push(Reason::rule(RuleKind::OversoldRsi, pts));
        }
    }

    if let Some(lower) = now.bb_lower {
        if lower > 0.0 && latest.close < lower {
            let pts = config.bollinger.points((lower - latest.close) / lower, rounding);
            reasons.push(Reason::rule(RuleKind::BelowBollinger, pts));
        }
    }

    if !trailing_closes.is_empty() {
        let high = trailing_closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low = trailing_closes.iter().copied().fold(f64::INFINITY, f64::min);
        if latest.close > high {
            reasons.push(Reason::rule(RuleKind::HighBreakout, config.high_points));
        }
        if latest.close < low {
            reasons.push(Reason::rule(RuleKind::LowBreakdown, config.low_points));
        }
    }

    reasons.push(Reason::rule(RuleKind::Market, config.market_bonus));
    reasons
}

/// Returns the latest pair when `a` was strictly below `b` on the previous bar
/// and is strictly above it now.
fn crossed_above(
    prev: (Option<f64>, Option<f64>),
    now: (Option<f64>, Option<f64>),
) -> Option<(f64, f64)> {
    let (pa, pb) = (prev.0?, prev.1?);
    let (na, nb) = (now.0?, now.1?);
    (pa < pb && na > nb).then_some((na, nb))
}

fn check_length(series: &PriceSeries, config: &ScoringConfig) -> Result<(), ScoringError> {
    let required = config.min_bars.max(config.breakout_window + 1).max(2);
    if series.len() < required {
        return Err(insufficient(
            series,
            config,
            "series shorter than minimum bar count".to_string(),
        ));
    }
    Ok(())
}

fn insufficient(series: &PriceSeries, config: &ScoringConfig, detail: String) -> ScoringError {
    ScoringError::DataInsufficient {
        code: series.code().to_string(),
        bars: series.len(),
        minimum: config.min_bars.max(config.breakout_window + 1).max(2),
        detail,
    }
}

fn log_unavailable(code: &str, latest: &RuleInputs, prev: &RuleInputs) {
    let checks = [
        ("macd", latest.indicators.macd.is_some() && prev.indicators.macd.is_some()),
        (
            "macd_signal",
            latest.indicators.macd_signal.is_some() && prev.indicators.macd_signal.is_some(),
        ),
        ("rsi", latest.indicators.rsi.is_some()),
        ("bb_lower", latest.indicators.bb_lower.is_some()),
    ];
    for (name, available) in checks {
        if !available {
            tracing::debug!(code, indicator = name, "indicator unavailable, rule skipped");
        }
    }
}
