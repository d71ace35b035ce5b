pub mod reset;
pub mod stats;

pub(crate) fn guild_only_message() -> &'static str {
    "This command can only be used in a server."
}
