//! Notifier that prints the message instead of delivering it (dry runs).

use crate::domain::error::KabuError;
use crate::ports::notify_port::NotifyPort;
use std::io::Write;

pub struct StdoutNotifier;

impl NotifyPort for StdoutNotifier {
    fn send(&self, text: &str) -> Result<(), KabuError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }
}
