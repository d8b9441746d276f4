//! Batch scan over the listing universe.
//!
//! Loads and scores every listing, then every holding that is not also a
//! listing. Per-instrument failures never abort the scan: depending on the
//! [`FailurePolicy`] they become zero-score placeholder records or are left
//! out of the ranking entirely.

use crate::domain::error::{KabuError, ScoringError};
use crate::domain::price_series::PriceSeries;
use crate::domain::ranking::{rank_buy_candidates, sell_candidates};
use crate::domain::reason::{LoadFailure, Reason, ScoreResult, ScoringFailure};
use crate::domain::scoring::{self, ScoringConfig};
use crate::domain::universe::Universe;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::str::FromStr;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_HISTORY_BARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep a zero-score record whose only reason names the failure.
    #[default]
    Placeholder,
    /// Drop the instrument from ranking.
    Exclude,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "placeholder" => Ok(FailurePolicy::Placeholder),
            "exclude" => Ok(FailurePolicy::Exclude),
            other => Err(format!(
                "unknown failure policy '{other}' (expected placeholder or exclude)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub scoring: ScoringConfig,
    pub top_n: usize,
    pub history_bars: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            top_n: DEFAULT_TOP_N,
            history_bars: DEFAULT_HISTORY_BARS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Why one instrument produced no score.
#[derive(Debug)]
pub enum ScanFailure {
    Load(KabuError),
    Scoring(ScoringError),
}

impl ScanFailure {
    pub fn reason(&self) -> Reason {
        match self {
            ScanFailure::Load(KabuError::NoData { .. }) => Reason::LoadFailed(LoadFailure::NoData),
            // The file was readable but its content is unusable.
            ScanFailure::Load(KabuError::MalformedInput { .. }) => {
                Reason::ScoringFailed(ScoringFailure::MalformedInput)
            }
            ScanFailure::Load(_) => Reason::LoadFailed(LoadFailure::SourceError),
            ScanFailure::Scoring(ScoringError::DataInsufficient { .. }) => {
                Reason::ScoringFailed(ScoringFailure::DataInsufficient)
            }
            ScanFailure::Scoring(ScoringError::MalformedInput { .. }) => {
                Reason::ScoringFailed(ScoringFailure::MalformedInput)
            }
        }
    }
}

impl std::fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanFailure::Load(e) => write!(f, "{}", e),
            ScanFailure::Scoring(e) => write!(f, "{}", e),
        }
    }
}

impl From<ScanFailure> for KabuError {
    fn from(failure: ScanFailure) -> Self {
        match failure {
            ScanFailure::Load(e) => e,
            ScanFailure::Scoring(e) => e.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub buy: Vec<ScoreResult>,
    pub sell: Vec<ScoreResult>,
    pub scored: usize,
    pub failed: usize,
}

/// Load, trim and score one code.
pub fn score_code(
    data_port: &dyn DataPort,
    code: &str,
    config: &ScanConfig,
) -> Result<ScoreResult, ScanFailure> {
    let bars = data_port.fetch_ohlcv(code).map_err(ScanFailure::Load)?;
    if bars.is_empty() {
        return Err(ScanFailure::Load(KabuError::NoData {
            code: code.to_string(),
        }));
    }
    let series = PriceSeries::new(code, bars)
        .map_err(ScanFailure::Scoring)?
        .tail(config.history_bars);
    scoring::score(&series, &config.scoring).map_err(ScanFailure::Scoring)
}

struct Tally {
    scored: usize,
    failed: usize,
}

fn score_into(
    data_port: &dyn DataPort,
    code: &str,
    config: &ScanConfig,
    results: &mut Vec<ScoreResult>,
    tally: &mut Tally,
) {
    match score_code(data_port, code, config) {
        Ok(result) => {
            tally.scored += 1;
            results.push(result);
        }
        Err(failure) => {
            tally.failed += 1;
            let reason = failure.reason();
            match config.failure_policy {
                FailurePolicy::Placeholder => {
                    tracing::warn!(code, reason = %reason, error = %failure, "scoring failed, using placeholder");
                    results.push(ScoreResult::placeholder(code, reason));
                }
                FailurePolicy::Exclude => {
                    tracing::warn!(code, reason = %reason, error = %failure, "scoring failed, excluded");
                }
            }
        }
    }
}

/// Score the universe and holdings and select buy and sell candidates.
pub fn run_scan(
    data_port: &dyn DataPort,
    universe: &Universe,
    holdings: &[String],
    config: &ScanConfig,
) -> ScanReport {
    tracing::info!(
        listings = universe.count(),
        holdings = holdings.len(),
        "starting scan"
    );

    let mut tally = Tally {
        scored: 0,
        failed: 0,
    };
    let mut listed = Vec::with_capacity(universe.count());
    for code in universe.codes() {
        score_into(data_port, &code, config, &mut listed, &mut tally);
    }

    let listed_codes: HashSet<String> = universe.codes().into_iter().collect();
    let mut extra = Vec::new();
    for code in holdings.iter().filter(|c| !listed_codes.contains(*c)) {
        score_into(data_port, code, config, &mut extra, &mut tally);
    }

    let buy = rank_buy_candidates(&listed, config.top_n);
    let all: Vec<ScoreResult> = listed.into_iter().chain(extra).collect();
    let sell = sell_candidates(&all, holdings);

    tracing::info!(
        scored = tally.scored,
        failed = tally.failed,
        buy = buy.len(),
        sell = sell.len(),
        "scan complete"
    );

    ScanReport {
        generated_at: Utc::now(),
        buy,
        sell,
        scored: tally.scored,
        failed: tally.failed,
    }
}
