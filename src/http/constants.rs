//! Timeout defaults for the shared HTTP client.

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes without receiving any data).
///
/// This bounds each read, not the whole transfer; a large file may take
/// longer as long as data keeps arriving.
pub const READ_TIMEOUT_SECS: u64 = 300;
