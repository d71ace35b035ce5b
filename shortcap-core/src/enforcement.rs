use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use shortcap_database::{Decision, QuotaEngine};
use shortcap_utils::formatting::window_label_days;
use shortcap_utils::links::{LinkMatcher, ShortsLinkMatcher};

use crate::config::EnforcementConfig;

/// The parts of an incoming chat message the enforcer looks at.
#[derive(Clone, Copy, Debug)]
pub struct InboundMessage<'a> {
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub user_id: u64,
    pub content: Option<&'a str>,
    pub from_bot_or_webhook: bool,
}

/// Terminal state of one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Not inspected: bot/webhook author, direct message, or no Shorts link.
    Passthrough,
    Allowed,
    Blocked,
}

#[derive(Debug)]
pub enum ActionError {
    MissingPermissions,
    Failed(anyhow::Error),
}

pub type ActionResult = Result<(), ActionError>;

/// Outbound effects run against a blocked message. Every call is best effort.
pub trait BlockActions {
    fn delete_offending(&self) -> impl Future<Output = ActionResult> + Send;

    /// Post `text` in the originating channel and remove it after `lifetime`.
    fn send_transient_notice(
        &self,
        text: String,
        lifetime: Duration,
    ) -> impl Future<Output = ActionResult> + Send;

    fn send_private_notice(&self, text: String) -> impl Future<Output = ActionResult> + Send;
}

/// Runs matcher, quota engine and block actions for each message.
#[derive(Clone, Debug)]
pub struct Enforcer<M = ShortsLinkMatcher> {
    quota: QuotaEngine,
    config: EnforcementConfig,
    matcher: M,
}

impl Enforcer {
    pub fn new(quota: QuotaEngine, config: EnforcementConfig) -> Self {
        Self::with_matcher(quota, config, ShortsLinkMatcher)
    }
}

impl<M: LinkMatcher> Enforcer<M> {
    pub fn with_matcher(quota: QuotaEngine, config: EnforcementConfig, matcher: M) -> Self {
        Self {
            quota,
            config,
            matcher,
        }
    }

    /// Decide one message and carry out the block side effects.
    ///
    /// A storage error fails closed: the message is removed (when deletion is
    /// enabled), the channel is told the quota could not be checked, and the
    /// error is returned for the caller to log.
    pub async fn handle_message<A>(
        &self,
        message: &InboundMessage<'_>,
        actions: &A,
        now: u64,
    ) -> anyhow::Result<Outcome>
    where
        A: BlockActions + Sync,
    {
        if message.from_bot_or_webhook {
            return Ok(Outcome::Passthrough);
        }

        let Some(guild_id) = message.guild_id else {
            return Ok(Outcome::Passthrough);
        };

        let content = message.content.unwrap_or_default();
        if !self.matcher.has_links(content) {
            return Ok(Outcome::Passthrough);
        }

        let user_id = message.user_id;
        let decision = match self
            .quota
            .evaluate_and_commit(guild_id, user_id, now)
            .await
        {
            Ok(decision) => decision,
            Err(source) => {
                self.fail_closed(user_id, actions).await;
                return Err(source.context("shorts quota check failed"));
            }
        };

        match decision {
            Decision::Allow => Ok(Outcome::Allowed),
            Decision::Block => {
                info!(guild_id, user_id, "blocked shorts post over quota");
                self.run_block_actions(user_id, actions).await;
                Ok(Outcome::Blocked)
            }
        }
    }

    async fn run_block_actions<A>(&self, user_id: u64, actions: &A)
    where
        A: BlockActions + Sync,
    {
        let window_label = window_label_days(self.config.window_days);
        let mut notice = format!(
            "Hey <@{}>, you've already posted a YouTube Shorts link in the last {}. This one was blocked.",
            user_id, window_label
        );

        if self.config.delete_offending_messages {
            match actions.delete_offending().await {
                Ok(()) => {}
                Err(ActionError::MissingPermissions) => {
                    warn!(user_id, "missing permissions to delete blocked shorts post");
                    notice.push_str(" (I don't have permission to delete messages.)");
                }
                Err(ActionError::Failed(source)) => {
                    debug!(?source, user_id, "failed to delete blocked shorts post");
                }
            }
        }

        if let Err(source) = actions
            .send_transient_notice(notice, self.config.notice_lifetime)
            .await
        {
            log_action_failure("channel notice", user_id, source);
        }

        if self.config.dm_user_on_block {
            let dm = format!(
                "Your Shorts link was blocked because you've hit the limit of 1 per {} in that server.",
                window_label
            );
            if let Err(source) = actions.send_private_notice(dm).await {
                log_action_failure("direct message", user_id, source);
            }
        }
    }

    async fn fail_closed<A>(&self, user_id: u64, actions: &A)
    where
        A: BlockActions + Sync,
    {
        let removed = if self.config.delete_offending_messages {
            match actions.delete_offending().await {
                Ok(()) => true,
                Err(source) => {
                    log_action_failure("delete", user_id, source);
                    false
                }
            }
        } else {
            false
        };

        let notice = if removed {
            format!(
                "<@{}>, I couldn't check your Shorts quota right now, so your link was removed. Please try again later.",
                user_id
            )
        } else {
            format!(
                "<@{}>, I couldn't check your Shorts quota right now. Please repost your link later.",
                user_id
            )
        };

        if let Err(source) = actions
            .send_transient_notice(notice, self.config.notice_lifetime)
            .await
        {
            log_action_failure("quota failure notice", user_id, source);
        }
    }
}

fn log_action_failure(action: &str, user_id: u64, source: ActionError) {
    match source {
        ActionError::MissingPermissions => {
            warn!(user_id, action, "missing permissions for shorts block action");
        }
        ActionError::Failed(source) => {
            debug!(?source, user_id, action, "shorts block action failed");
        }
    }
}
