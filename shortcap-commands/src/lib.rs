pub mod shorts;

use shortcap_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[shorts::stats::META, shorts::reset::META];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![shorts::stats::shorts_stats(), shorts::reset::shorts_reset_me()]
}

/// Look up the usage string for a command by its qualified name.
pub fn usage_for(name: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|command| command.name == name)
        .map(|command| command.usage)
}
