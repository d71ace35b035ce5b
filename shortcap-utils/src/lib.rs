/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (durations, window labels).
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Shorts link detection.
pub mod links;
/// Shared time helpers.
pub mod time;
