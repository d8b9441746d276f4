//! Instrument universe: listing codes, display names and code lists from
//! configuration.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Default holdings checked for sell signals.
pub const DEFAULT_HOLDINGS: &str = "2503,4661,5411,8233,8304";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

/// Normalizes a security code: numeric codes are left-padded with zeros to
/// four digits (`"72"` -> `"0072"`), anything else is upper-cased.
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    // Spreadsheet exports sometimes turn codes into floats ("7203.0").
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("{trimmed:0>4}")
    } else {
        trimmed.to_uppercase()
    }
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = normalize_code(trimmed);
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub code: String,
    pub name: Option<String>,
}

impl Listing {
    pub fn new(code: &str, name: Option<&str>) -> Self {
        Self {
            code: normalize_code(code),
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }
}

/// Where the scanned codes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniverseSource {
    /// Every code in the listing file.
    #[default]
    Listings,
    /// Every `<code>.csv` in the price directory; the listing file, if any,
    /// only supplies names.
    DataDir,
}

impl FromStr for UniverseSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "listings" => Ok(UniverseSource::Listings),
            "data_dir" | "data" => Ok(UniverseSource::DataDir),
            other => Err(format!(
                "unknown universe source '{other}' (expected listings or data_dir)"
            )),
        }
    }
}

/// The listings to scan, with a code -> name lookup for reporting.
///
/// Duplicate codes keep their first occurrence.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    listings: Vec<Listing>,
    names: HashMap<String, String>,
}

impl Universe {
    pub fn new(listings: Vec<Listing>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(listings.len());
        let mut names = HashMap::new();
        for listing in listings {
            if !seen.insert(listing.code.clone()) {
                continue;
            }
            if let Some(name) = &listing.name {
                names.insert(listing.code.clone(), name.clone());
            }
            kept.push(listing);
        }
        Self {
            listings: kept,
            names,
        }
    }

    /// `codes` in the given order, named from `names` where it knows them.
    pub fn named_from(codes: &[String], names: &Universe) -> Self {
        Self::new(
            codes
                .iter()
                .map(|c| Listing::new(c, names.name_of(&normalize_code(c))))
                .collect(),
        )
    }

    pub fn codes(&self) -> Vec<String> {
        self.listings.iter().map(|l| l.code.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.listings.len()
    }

    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }
}
