use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::shorts::guild_only_message;
use shortcap_core::{Context, Error};
use shortcap_database::QuotaStats;
use shortcap_utils::embed::build_embed;
use shortcap_utils::formatting::{format_compact_duration, sanitize_mentions, window_label_days};
use shortcap_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "shorts_stats",
    usage: "!shorts_stats [member]",
};

#[poise::command(prefix_command, slash_command, guild_only, ephemeral, category = "Shorts")]
pub async fn shorts_stats(
    ctx: Context<'_>,
    #[description = "The member to check (defaults to you)"] member: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let user = member.as_ref().unwrap_or_else(|| ctx.author());
    let window_days = ctx.data().config.window_days;
    let now = now_unix_secs();

    let stats = ctx
        .data()
        .quota
        .stats(guild_id.get(), user.id.get(), now)
        .await?;

    let display_name = sanitize_mentions(user.global_name.as_deref().unwrap_or(&user.name));
    let footer = format!("1 Shorts link per {}", window_label_days(window_days));
    let embed = build_embed(
        "Shorts Stats",
        stats_description(&display_name, &stats, window_days, now),
        Some(footer.as_str()),
    );

    ctx.send(poise::CreateReply::default().ephemeral(true).embed(embed))
        .await?;

    Ok(())
}

fn stats_description(display_name: &str, stats: &QuotaStats, window_days: u64, now: u64) -> String {
    let mut lines = vec![format!(
        "{} has posted **{}** Shorts link(s) in the last {}.",
        display_name,
        stats.count,
        window_label_days(window_days)
    )];

    if let Some(latest) = stats.latest_posted_at {
        lines.push(format!("**Last post :** <t:{}:R>", latest));
    }

    match stats.next_allowed_at {
        Some(next) if next > now => lines.push(format!(
            "**Next allowed :** in {} (<t:{}:f>)",
            format_compact_duration(next - now),
            next
        )),
        _ => lines.push("**Next allowed :** now".to_owned()),
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use shortcap_database::QuotaStats;

    use super::stats_description;

    #[test]
    fn describes_an_unused_quota() {
        let stats = QuotaStats {
            count: 0,
            latest_posted_at: None,
            next_allowed_at: None,
        };

        let text = stats_description("Ada", &stats, 7, 1_000);
        assert_eq!(
            text,
            "Ada has posted **0** Shorts link(s) in the last 7 days.\n**Next allowed :** now"
        );
    }

    #[test]
    fn describes_an_exhausted_quota() {
        let stats = QuotaStats {
            count: 1,
            latest_posted_at: Some(900),
            next_allowed_at: Some(5_000),
        };

        let text = stats_description("Ada", &stats, 1, 1_000);
        assert!(text.contains("**1** Shorts link(s) in the last 1 day."));
        assert!(text.contains("**Last post :** <t:900:R>"));
        assert!(text.contains("**Next allowed :** in 1h 6m (<t:5000:f>)"));
    }
}
