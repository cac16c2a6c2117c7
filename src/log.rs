//! An injected logging sink for advisory messages.
//!
//! The core never depends on a global logger: callers that care about
//! advisory messages (a demoted `FK4_NO_E`, an assumed `epoch_obs`, ...)
//! supply a `&dyn LogSink`. Logging is never load-bearing: dropping the
//! sink never changes control flow, only observability.

use std::fmt;

/// Severity of an advisory message emitted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Diagnostic detail not normally of interest.
    Debug,
    /// A behavior the caller may want to know about, but that is not an error.
    Warn,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Warn => write!(f, "WARN"),
        }
    }
}

/// A sink that receives advisory messages from the core.
///
/// Implementations must not block indefinitely or panic; the core calls
/// this synchronously on the hot path (e.g. once per frame conversion).
pub trait LogSink {
    /// Receives a single advisory message at the given severity.
    fn log(&self, level: LogLevel, message: &str);
}

/// A [`LogSink`] that discards every message. Used as the default when a
/// caller does not care about advisory output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// A [`LogSink`] that forwards messages to an arbitrary closure, useful for
/// tests that want to assert on what was logged.
pub struct FnLogSink<F: Fn(LogLevel, &str)> {
    f: F,
}

impl<F: Fn(LogLevel, &str)> FnLogSink<F> {
    /// Wraps `f` as a [`LogSink`].
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: Fn(LogLevel, &str)> LogSink for FnLogSink<F> {
    fn log(&self, level: LogLevel, message: &str) {
        (self.f)(level, message)
    }
}
