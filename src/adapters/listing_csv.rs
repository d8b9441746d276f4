//! Exchange listing file loader.
//!
//! Reads the scan universe from a CSV with a code column (`Code` or `コード`)
//! and an optional name column (`Name` or `銘柄名`).

use crate::adapters::csv_adapter::normalize_header;
use crate::domain::error::KabuError;
use crate::domain::universe::{Listing, Universe};
use std::path::Path;

const CODE_COLUMNS: [&str; 2] = ["code", "コード"];
const NAME_COLUMNS: [&str; 2] = ["name", "銘柄名"];

pub fn load_listings(path: &Path) -> Result<Universe, KabuError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| KabuError::DataSource {
            reason: format!("failed to open listings {}: {}", path.display(), e),
        })?;

    let headers = rdr.headers().map_err(|e| KabuError::DataSource {
        reason: format!("listing header error in {}: {}", path.display(), e),
    })?;
    let names: Vec<String> = headers.iter().map(normalize_header).collect();
    let find = |candidates: &[&str]| {
        names
            .iter()
            .position(|n| candidates.iter().any(|c| *c == n.as_str()))
    };

    let code_i = find(&CODE_COLUMNS).ok_or_else(|| KabuError::MalformedInput {
        code: path.display().to_string(),
        reason: "listing file has no Code column".into(),
    })?;
    let name_i = find(&NAME_COLUMNS);

    let mut listings = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| KabuError::DataSource {
            reason: format!("listing parse error in {}: {}", path.display(), e),
        })?;
        let code = record.get(code_i).unwrap_or("").trim();
        if code.is_empty() {
            continue;
        }
        listings.push(Listing::new(code, name_i.and_then(|i| record.get(i))));
    }

    let universe = Universe::new(listings);
    tracing::info!(
        path = %path.display(),
        count = universe.count(),
        "loaded listings"
    );
    Ok(universe)
}
