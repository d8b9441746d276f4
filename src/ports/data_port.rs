//! Price history access port.

use crate::domain::error::KabuError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Daily bars for `code`, oldest first. An unknown code is
    /// `KabuError::NoData`; a present but unusable source is
    /// `KabuError::DataSource` or `KabuError::MalformedInput`.
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, KabuError>;

    fn list_symbols(&self) -> Result<Vec<String>, KabuError>;
}
