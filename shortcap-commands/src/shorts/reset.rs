use tracing::info;

use crate::CommandMeta;
use crate::shorts::guild_only_message;
use shortcap_core::{Context, Error};
use shortcap_utils::formatting::window_label_days;
use shortcap_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "shorts_reset_me",
    usage: "!shorts_reset_me",
};

#[poise::command(prefix_command, slash_command, guild_only, ephemeral, category = "Shorts")]
pub async fn shorts_reset_me(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let user_id = ctx.author().id;
    let removed = ctx
        .data()
        .quota
        .reset(guild_id.get(), user_id.get(), now_unix_secs())
        .await?;

    info!(
        guild_id = guild_id.get(),
        user_id = user_id.get(),
        removed,
        "user reset their shorts window"
    );

    ctx.say(format!(
        "Your Shorts count for the current {} window was reset.",
        window_label_days(ctx.data().config.window_days)
    ))
    .await?;

    Ok(())
}
