use std::env;
use std::time::Duration;

use shortcap_utils::time::days_to_secs;

pub const DEFAULT_WINDOW_DAYS: u64 = 7;
pub const DEFAULT_NOTICE_LIFETIME: Duration = Duration::from_secs(8);

/// Enforcement options, read once at startup and passed down explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnforcementConfig {
    pub window_days: u64,
    pub delete_offending_messages: bool,
    pub dm_user_on_block: bool,
    /// How long the in-channel block notice stays up before it is removed.
    pub notice_lifetime: Duration,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            delete_offending_messages: true,
            dm_user_on_block: true,
            notice_lifetime: DEFAULT_NOTICE_LIFETIME,
        }
    }
}

impl EnforcementConfig {
    /// Read `SHORTS_*` variables, falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            window_days: parse_u64(lookup("SHORTS_WINDOW_DAYS"), defaults.window_days).max(1),
            delete_offending_messages: parse_bool(
                lookup("SHORTS_DELETE_OFFENDING"),
                defaults.delete_offending_messages,
            ),
            dm_user_on_block: parse_bool(lookup("SHORTS_DM_ON_BLOCK"), defaults.dm_user_on_block),
            notice_lifetime: Duration::from_secs(parse_u64(
                lookup("SHORTS_NOTICE_SECONDS"),
                defaults.notice_lifetime.as_secs(),
            )),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(days_to_secs(self.window_days))
    }
}

pub fn env_bool(key: &str, default: bool) -> bool {
    parse_bool(env::var(key).ok(), default)
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    parse_u64(env::var(key).ok(), default)
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

fn parse_u64(value: Option<String>, default: u64) -> u64 {
    match value {
        Some(value) => value.trim().parse::<u64>().unwrap_or(default),
        None => default,
    }
}
