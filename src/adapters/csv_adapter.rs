//! CSV file data adapter.
//!
//! One file per code, `<base_path>/<code>.csv`, with a header row. Columns are
//! located by name after lower-casing and replacing spaces with `_`, so both
//! `Date,Open,High,Low,Close,Adj Close,Volume` exports and plain lower-case
//! files load.

use crate::domain::error::KabuError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

pub(crate) fn normalize_header(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace(' ', "_")
}

/// Accepts `YYYY-MM-DD` with an optional time suffix (`2024-01-15 00:00:00+09:00`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, KabuError> {
        let path = self.csv_path(code);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(KabuError::NoData {
                    code: code.to_string(),
                });
            }
            Err(e) => {
                return Err(KabuError::DataSource {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| KabuError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut idx = [0usize; 6];
        for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| KabuError::MalformedInput {
                    code: code.to_string(),
                    reason: format!("missing {} column", column),
                })?;
        }
        let [date_i, open_i, high_i, low_i, close_i, volume_i] = idx;

        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| KabuError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let field = |i: usize| record.get(i).unwrap_or("");

            let (Some(date), Some(close), Some(volume)) = (
                parse_date(field(date_i)),
                parse_number(field(close_i)),
                parse_number(field(volume_i)).filter(|v| *v >= 0.0),
            ) else {
                dropped += 1;
                continue;
            };

            bars.push(OhlcvBar {
                code: code.to_string(),
                date,
                open: parse_number(field(open_i)).unwrap_or(close),
                high: parse_number(field(high_i)).unwrap_or(close),
                low: parse_number(field(low_i)).unwrap_or(close),
                close,
                volume: volume.round() as i64,
            });
        }

        if dropped > 0 {
            tracing::debug!(code, dropped, "dropped rows with missing close/volume");
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, KabuError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| KabuError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| KabuError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
