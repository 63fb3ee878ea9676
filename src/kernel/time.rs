use std::time::{SystemTime, UNIX_EPOCH};

pub const SAMPLE_INTERVAL_MS: u64 = 5_000;
pub const FOREGROUND_WINDOW_MS: u64 = 10_000;

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
