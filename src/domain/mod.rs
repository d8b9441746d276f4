//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_set;
pub mod ohlcv;
pub mod price_series;
pub mod ranking;
pub mod reason;
pub mod report;
pub mod scoring;
pub mod screener;
pub mod universe;
