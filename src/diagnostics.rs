//! Diagnostics sink handed to every component that can report non-fatal problems.

use std::sync::Mutex;
use tracing::{error, info, warn};

/// Receiver for progress and warning messages.
///
/// Components take a `&dyn Diagnostics` instead of logging to a global
/// logger, so callers decide where messages go.
pub trait Diagnostics: Send + Sync {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Forwards messages to the `tracing` subscriber installed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn info(&self, msg: &str) {
        info!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        warn!("{}", msg);
    }

    fn error(&self, msg: &str) {
        error!("{}", msg);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct CapturedDiagnostics {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl CapturedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, severity: Severity, msg: &str) {
        // A poisoned lock only means another thread panicked mid-push.
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((severity, msg.to_string()));
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages reported at warning level, in the order they arrived.
    pub fn warnings(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(severity, _)| *severity == Severity::Warn)
            .map(|(_, msg)| msg)
            .collect()
    }
}

impl Diagnostics for CapturedDiagnostics {
    fn info(&self, msg: &str) {
        self.push(Severity::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Severity::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Severity::Error, msg);
    }
}
