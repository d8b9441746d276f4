//! Message delivery port.

use crate::domain::error::KabuError;

pub trait NotifyPort {
    fn send(&self, text: &str) -> Result<(), KabuError>;
}
