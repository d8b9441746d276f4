//! Configuration validation.
//!
//! Checks the typed scoring and scan settings for internal consistency
//! before any data is loaded.

use crate::domain::error::KabuError;
use crate::domain::scoring::ScoringConfig;
use crate::domain::screener::ScanConfig;
use crate::domain::universe::UniverseSource;
use crate::ports::config_port::ConfigPort;

fn invalid(section: &str, key: &str, reason: &str) -> KabuError {
    KabuError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scoring_config(config: &ScoringConfig) -> Result<(), KabuError> {
    validate_windows(config)?;
    validate_orderings(config)?;
    validate_thresholds(config)?;
    Ok(())
}

pub fn validate_scan_config(config: &ScanConfig) -> Result<(), KabuError> {
    validate_scoring_config(&config.scoring)?;
    if config.top_n == 0 {
        return Err(invalid("scan", "top_n", "top_n must be at least 1"));
    }
    if config.history_bars < config.scoring.min_bars {
        return Err(invalid(
            "scan",
            "history_bars",
            "history_bars must be at least min_bars",
        ));
    }
    Ok(())
}

/// A scan needs a price directory, plus a listing file unless the universe
/// is read from the price directory.
pub fn validate_scan_sources(
    config: &dyn ConfigPort,
    source: UniverseSource,
) -> Result<(), KabuError> {
    let required: &[&str] = match source {
        UniverseSource::Listings => &["data_dir", "listings"],
        UniverseSource::DataDir => &["data_dir"],
    };
    for &key in required {
        match config.get_string("scan", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(KabuError::ConfigMissing {
                    section: "scan".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_windows(config: &ScoringConfig) -> Result<(), KabuError> {
    let p = &config.indicators;
    let windows = [
        ("sma_short", p.sma_short),
        ("sma_long", p.sma_long),
        ("macd_fast", p.macd_fast),
        ("macd_slow", p.macd_slow),
        ("macd_signal", p.macd_signal),
        ("rsi_period", p.rsi_period),
        ("bb_period", p.bb_period),
        ("breakout_window", config.breakout_window),
    ];
    for (key, value) in windows {
        if value == 0 {
            return Err(invalid("scoring", key, "window must be at least 1"));
        }
    }
    Ok(())
}

fn validate_orderings(config: &ScoringConfig) -> Result<(), KabuError> {
    let p = &config.indicators;
    if p.sma_short >= p.sma_long {
        return Err(invalid(
            "scoring",
            "sma_short",
            "sma_short must be shorter than sma_long",
        ));
    }
    if p.macd_fast >= p.macd_slow {
        return Err(invalid(
            "scoring",
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }
    if config.min_bars <= p.sma_long {
        return Err(invalid(
            "scoring",
            "min_bars",
            "min_bars must exceed sma_long",
        ));
    }
    if config.min_bars <= config.breakout_window {
        return Err(invalid(
            "scoring",
            "min_bars",
            "min_bars must exceed breakout_window",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &ScoringConfig) -> Result<(), KabuError> {
    let bb_mult = config.indicators.bb_mult;
    if bb_mult.is_nan() || bb_mult <= 0.0 {
        return Err(invalid("scoring", "bb_mult", "bb_mult must be positive"));
    }
    if config.rsi_strong > config.rsi_weak {
        return Err(invalid(
            "scoring",
            "rsi_strong",
            "rsi_strong must not exceed rsi_weak",
        ));
    }
    if !(0.0..=100.0).contains(&config.rsi_weak) || !(0.0..=100.0).contains(&config.rsi_strong) {
        return Err(invalid(
            "scoring",
            "rsi_weak",
            "RSI thresholds must be within 0..100",
        ));
    }
    if [config.volume_scale, config.volume_cap]
        .iter()
        .any(|v| v.is_nan() || *v < 0.0)
    {
        return Err(invalid(
            "scoring",
            "volume_scale",
            "volume_scale and volume_cap must be non-negative",
        ));
    }
    Ok(())
}
