//! Where a run's debug messages go.
//!
//! The driver formats each message once and hands it to a [`LogSink`].
//! Closures taking `&str` are sinks, so tests can collect messages into a
//! `Vec<String>`; [`LogCrateSink`] forwards to the `log` facade.

/// Receives one formatted debug message at a time.
pub trait LogSink {
    fn log(&mut self, message: &str);
}

impl<F> LogSink for F
where
    F: FnMut(&str),
{
    fn log(&mut self, message: &str) {
        self(message)
    }
}

/// Forwards every message to `log::debug!` under the `surfer_core` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&mut self, message: &str) {
        log::debug!(target: "surfer_core", "{message}");
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&mut self, _message: &str) {}
}
