//! Structured logging for linestash.
//!
//! Subscriber setup (console, optional rolling NDJSON file, env-based level)
//! and redaction of credentials before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use tracing_appender::rolling::InitError;
pub use redact::redact_sensitive_data;
