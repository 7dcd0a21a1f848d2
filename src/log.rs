//! Injected logging capability for trigger functions.
//!
//! Functions record their informational output through [`InvocationLog`]
//! instead of calling a global logger, so a host can route the lines wherever
//! the platform expects them and tests can capture them.

use std::sync::Mutex;
use tracing::info;

/// Sink for the informational lines a function emits during one invocation.
pub trait InvocationLog: Send + Sync {
    /// Record a single log message.
    fn record(&self, message: &str);
}

/// Forwards records to `tracing` at info level.
#[derive(Debug, Clone)]
pub struct TracingLog {
    function_name: String,
}

impl TracingLog {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
        }
    }
}

impl InvocationLog for TracingLog {
    fn record(&self, message: &str) {
        info!(target: "function", function = %self.function_name, "{}", message);
    }
}

/// Keeps every record in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records captured so far.
    pub fn records(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take the captured records, leaving the log empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InvocationLog for MemoryLog {
    fn record(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

/// Sends every record to two logs.
pub struct TeeLog<'a> {
    first: &'a dyn InvocationLog,
    second: &'a dyn InvocationLog,
}

impl<'a> TeeLog<'a> {
    pub fn new(first: &'a dyn InvocationLog, second: &'a dyn InvocationLog) -> Self {
        Self { first, second }
    }
}

impl InvocationLog for TeeLog<'_> {
    fn record(&self, message: &str) {
        self.first.record(message);
        self.second.record(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryLog::new();
        log.record("one");
        log.record("two");
        assert_eq!(log.records(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn drain_empties_the_log() {
        let log = MemoryLog::new();
        log.record("line");
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn tee_records_once_in_each_sink() {
        let a = MemoryLog::new();
        let b = MemoryLog::new();
        TeeLog::new(&a, &b).record("hello");
        assert_eq!(a.len(), 1);
        assert_eq!(b.records(), vec!["hello".to_string()]);
    }
}
