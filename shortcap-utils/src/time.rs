use std::time::{SystemTime, UNIX_EPOCH};

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Convert a whole number of days into seconds, saturating on overflow.
pub fn days_to_secs(days: u64) -> u64 {
    days.saturating_mul(SECONDS_PER_DAY)
}
