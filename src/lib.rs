//! kabusignal: buy/sell signal screener for Tokyo Stock Exchange listings.
//!
//! Hexagonal architecture: scoring and ranking logic in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
