use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use shortcap_core::Data;
use shortcap_core::enforcement::{ActionError, ActionResult, BlockActions, InboundMessage, Outcome};
use shortcap_utils::time::now_unix_secs;

/// Run the Shorts quota on an incoming message.
pub async fn handle_message_shorts_limit(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) {
    let inbound = InboundMessage {
        guild_id: message.guild_id.map(|id| id.get()),
        user_id: message.author.id.get(),
        content: Some(message.content.as_str()),
        from_bot_or_webhook: message.author.bot
            || message.webhook_id.is_some()
            || !matches!(
                message.kind,
                serenity::MessageType::Regular | serenity::MessageType::InlineReply
            ),
    };

    let actions = DiscordBlockActions {
        http: Arc::clone(&ctx.http),
        message,
    };

    match data
        .enforcer
        .handle_message(&inbound, &actions, now_unix_secs())
        .await
    {
        Ok(Outcome::Passthrough) => {}
        Ok(outcome) => {
            debug!(
                ?outcome,
                message_id = message.id.get(),
                user_id = message.author.id.get(),
                "shorts post evaluated"
            );
        }
        Err(source) => {
            error!(
                ?source,
                message_id = message.id.get(),
                user_id = message.author.id.get(),
                "shorts quota unavailable; post was handled fail-closed"
            );
        }
    }
}

struct DiscordBlockActions<'a> {
    http: Arc<serenity::Http>,
    message: &'a serenity::Message,
}

impl BlockActions for DiscordBlockActions<'_> {
    async fn delete_offending(&self) -> ActionResult {
        self.message
            .delete(&self.http)
            .await
            .map_err(classify_action_error)
    }

    async fn send_transient_notice(&self, text: String, lifetime: Duration) -> ActionResult {
        let notice = self
            .message
            .channel_id
            .say(&self.http, text)
            .await
            .map_err(classify_action_error)?;

        // Removal runs detached so the private notice is not held up.
        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            if let Err(source) = notice.delete(&http).await {
                debug!(?source, "block notice already gone");
            }
        });

        Ok(())
    }

    async fn send_private_notice(&self, text: String) -> ActionResult {
        self.message
            .author
            .direct_message(&self.http, serenity::CreateMessage::new().content(text))
            .await
            .map(|_| ())
            .map_err(classify_action_error)
    }
}

fn classify_action_error(source: serenity::Error) -> ActionError {
    if is_missing_permissions(&source) {
        ActionError::MissingPermissions
    } else {
        ActionError::Failed(source.into())
    }
}

fn is_missing_permissions(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403
                // Missing Permissions / Cannot send messages to this user
                || response.error.code == 50013
                || response.error.code == 50007
    )
}
