use serenity::all::{
    ChannelType, CommandInteraction, CommandType, Context, CreateMessage, Interaction,
};
use tracing::{debug, error};

use crate::models::{Data, Error};
use crate::utils::embeds::error_report_embed;
use crate::utils::messages::truncate_message;

/// Route an interaction to its registered handler
///
/// Only command interactions are routed: chat-input commands go through the
/// command registry, user and message menus through the menu registry. An
/// unknown name is a no-op. A handler error is logged exactly once and
/// reported to the guild's botlog channel; it never propagates further and
/// the handler is not retried.
pub async fn handle_interaction(ctx: &Context, interaction: Interaction, data: &Data) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    let name = command.data.name.clone();
    let result = match command.data.kind {
        CommandType::ChatInput => match data.commands.get(name.as_str()) {
            Some(handler) => handler.run(ctx, data, &command).await,
            None => {
                debug!("No handler registered for command '{}'", name);
                return;
            }
        },
        CommandType::User | CommandType::Message => match data.menus.get(name.as_str()) {
            Some(handler) => handler.run(ctx, data, &command).await,
            None => {
                debug!("No handler registered for menu '{}'", name);
                return;
            }
        },
        _ => return,
    };

    if let Err(e) = result {
        error!("Handler for '{}' failed: {}", name, e);
        report_handler_error(ctx, data, &command, &e).await;
    }
}

/// Best-effort error report to the guild's botlog channel
///
/// Outside a guild, without a configured botlog channel, or with a botlog id
/// that does not resolve to a text channel, the report is dropped. A failure
/// while posting is logged and not retried.
async fn report_handler_error(
    ctx: &Context,
    data: &Data,
    command: &CommandInteraction,
    error: &Error,
) {
    let Some(guild_id) = command.guild_id else {
        return;
    };

    let preferences = match data.preferences_for(guild_id).await {
        Ok(preferences) => preferences,
        Err(e) => {
            error!("Could not load preferences for guild {}: {}", guild_id, e);
            return;
        }
    };
    let Some(botlog_channel_id) = preferences.and_then(|p| p.botlog_channel_id) else {
        debug!("Guild {} has no botlog channel configured", guild_id);
        return;
    };

    let kind = ctx.cache.channel(botlog_channel_id).map(|channel| channel.kind);
    if !is_text_capable(kind) {
        debug!(
            "Botlog channel {} does not resolve to a text channel, dropping error report",
            botlog_channel_id
        );
        return;
    }

    let embed = error_report_embed(
        command.channel_id,
        command.user.id,
        &truncate_message(&error.to_string(), 1000),
    );
    if let Err(e) = botlog_channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        error!(
            "Could not post error report to channel {}: {}",
            botlog_channel_id, e
        );
    }
}

/// Whether a botlog channel kind can receive the error report
///
/// A channel missing from the gateway cache cannot be resolved and counts as
/// not text-capable.
fn is_text_capable(kind: Option<ChannelType>) -> bool {
    matches!(
        kind,
        Some(
            ChannelType::Text
                | ChannelType::News
                | ChannelType::PublicThread
                | ChannelType::PrivateThread
                | ChannelType::NewsThread
        )
    )
}
