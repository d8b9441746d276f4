#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use kabusignal::domain::error::KabuError;
pub use kabusignal::domain::ohlcv::OhlcvBar;
use kabusignal::ports::data_port::DataPort;
use kabusignal::ports::notify_port::NotifyPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, KabuError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(KabuError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, KabuError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

/// Collects every message instead of delivering it.
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl NotifyPort for RecordingNotifier {
    fn send(&self, text: &str) -> Result<(), KabuError> {
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bars from 2024-01-01 with open/high/low equal to close.
pub fn bars_from_closes(code: &str, closes: &[f64], volume: i64) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            code: code.to_string(),
            date: start + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        })
        .collect()
}

pub fn flat_bars(code: &str, count: usize, close: f64) -> Vec<OhlcvBar> {
    bars_from_closes(code, &vec![close; count], 1000)
}

/// 30 bars whose short SMA crosses above the long SMA on the last bar by far
/// more than the cap: scores GC+15, High+5, Market+5.
pub fn golden_cross_bars(code: &str) -> Vec<OhlcvBar> {
    let mut closes = vec![100.0; 24];
    closes.extend([99.0; 5]);
    closes.push(200.0);
    bars_from_closes(code, &closes, 1000)
}

/// Steady climb, then a close just under the prior 7-bar low: scores
/// Low-10, Market+5.
pub fn breakdown_bars(code: &str) -> Vec<OhlcvBar> {
    let mut closes: Vec<f64> = (0..39).map(|i| 100.0 + i as f64).collect();
    closes.push(131.0);
    bars_from_closes(code, &closes, 1000)
}

/// Deterministic zig-zag with some drift, for long-history tests.
pub fn wavy_bars(code: &str, count: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count)
        .map(|i| 1000.0 + (i as f64 * 0.7).sin() * 40.0 + i as f64 * 0.5)
        .collect();
    let start = date(2023, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            code: code.to_string(),
            date: start + Duration::days(i as i64),
            open: close - 2.0,
            high: close + 5.0,
            low: close - 5.0,
            close,
            volume: 10_000 + ((i * 37) % 900) as i64,
        })
        .collect()
}

pub fn codes(results: &[kabusignal::domain::reason::ScoreResult]) -> Vec<&str> {
    results.iter().map(|r| r.code()).collect()
}
