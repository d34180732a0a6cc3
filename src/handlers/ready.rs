use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serenity::all::{
    ActivityData, ChannelType, Command, Context, CreateCommand, CreateMessage, OnlineStatus, Ready,
};
use tracing::{debug, error, info, warn};

use crate::constants::{
    FORCED_MUTE_SWEEP_PERIOD, LOCKDOWN_REFRESH_PERIOD, PRACTICE_QUESTION_PERIOD, PRESENCE_WATCHING,
    STICKY_REFRESH_PERIOD,
};
use crate::models::{Data, Error};
use crate::tasks::{lockdown, mutes, practice, sticky};
use crate::utils::embeds::{StartupSummary, format_epoch_date, startup_summary_embed};

/// One-shot startup sequence, run on the first gateway ready event
///
/// Reconnects deliver ready again; the guard turns every later delivery into
/// a no-op. Each step tolerates failure so the steps after it still run.
pub async fn handle_ready(ctx: &Context, ready: &Ready, data: &Arc<Data>, started: &AtomicBool) {
    if started.swap(true, Ordering::SeqCst) {
        debug!("Ready re-delivered by the gateway, ignoring");
        return;
    }

    info!("Connected as {}", ready.user.tag());

    // 1. Presence
    ctx.set_presence(
        Some(ActivityData::watching(PRESENCE_WATCHING)),
        OnlineStatus::Online,
    );

    // 2. Startup summary to the error-logs channel
    if let Err(e) = post_startup_summary(ctx, ready, data).await {
        error!("Could not post startup summary: {}", e);
    }

    // 3. Side loops, only for commands that are actually registered
    if data.commands.contains_key("practice") {
        let task_ctx = ctx.clone();
        let task_data = data.clone();
        data.tasks.spawn_periodic(
            "practice-questions",
            PRACTICE_QUESTION_PERIOD,
            move || {
                let ctx = task_ctx.clone();
                let data = task_data.clone();
                async move { practice::deliver_due_questions(&ctx, &data).await }
            },
        );
    }
    if data.commands.contains_key("gostudy") {
        let task_ctx = ctx.clone();
        let task_data = data.clone();
        data.tasks.spawn_periodic("focus-mutes", FORCED_MUTE_SWEEP_PERIOD, move || {
            let ctx = task_ctx.clone();
            let data = task_data.clone();
            async move { mutes::lift_expired_mutes(&ctx, &data).await }
        });
    }

    // 4. Command definition sync
    if let Err(e) = sync_command_definitions(ctx, data).await {
        error!("Could not synchronize command definitions: {}", e);
    }

    // 5. Keyword cache warm
    if let Err(e) = warm_keyword_cache(data).await {
        error!("Could not warm the keyword cache: {}", e);
    }

    // 6. Window pollers
    {
        let task_data = data.clone();
        data.tasks
            .spawn_periodic("sticky-messages", STICKY_REFRESH_PERIOD, move || {
                let data = task_data.clone();
                async move { sticky::refresh_sticky_messages(&data).await }
            });
    }
    {
        let task_ctx = ctx.clone();
        let task_data = data.clone();
        data.tasks
            .spawn_periodic("channel-lockdowns", LOCKDOWN_REFRESH_PERIOD, move || {
                let ctx = task_ctx.clone();
                let data = task_data.clone();
                async move { lockdown::refresh_channel_lockdowns(&ctx, &data).await }
            });
    }

    info!("Startup sequence complete");
}

/// Post the one-time summary embed to the configured error-logs channel
async fn post_startup_summary(ctx: &Context, ready: &Ready, data: &Data) -> Result<(), Error> {
    let config = &data.config;

    // Everything needed from the cache is copied out before the send
    let summary = {
        let Some(guild) = ctx.cache.guild(config.main_guild_id) else {
            warn!(
                "Main guild {} not in cache, skipping startup summary",
                config.main_guild_id
            );
            return Ok(());
        };

        let mut text_channels = 0;
        let mut voice_channels = 0;
        let mut categories = 0;
        for channel in guild.channels.values() {
            match channel.kind {
                ChannelType::Text | ChannelType::News | ChannelType::Forum => text_channels += 1,
                ChannelType::Voice | ChannelType::Stage => voice_channels += 1,
                ChannelType::Category => categories += 1,
                _ => {}
            }
        }

        StartupSummary {
            bot_tag: ready.user.tag(),
            bot_face: ready.user.face(),
            guild_name: guild.name.clone(),
            guild_created: format_epoch_date(config.main_guild_id.created_at().unix_timestamp()),
            member_count: guild.member_count,
            text_channels,
            voice_channels,
            categories,
            command_count: data.commands.len(),
            menu_count: data.menus.len(),
        }
    };

    config
        .error_logs_channel_id
        .send_message(
            &ctx.http,
            CreateMessage::new().embed(startup_summary_embed(&summary)),
        )
        .await?;

    Ok(())
}

/// Bulk-upsert every registered command and menu definition
///
/// Scoped to the dev guild when one is configured, global otherwise. The
/// upload replaces the previous definition set, so removed handlers
/// disappear on the next start.
async fn sync_command_definitions(ctx: &Context, data: &Data) -> Result<(), Error> {
    let definitions: Vec<CreateCommand> = data
        .commands
        .values()
        .map(|command| command.definition())
        .chain(data.menus.values().map(|menu| menu.definition()))
        .collect();
    let count = definitions.len();

    match data.config.dev_guild_id {
        Some(dev_guild_id) => {
            dev_guild_id.set_commands(&ctx.http, definitions).await?;
            info!(
                "Synchronized {} command definitions to dev guild {}",
                count, dev_guild_id
            );
        }
        None => {
            Command::set_global_commands(&ctx.http, definitions).await?;
            info!("Synchronized {} global command definitions", count);
        }
    }

    Ok(())
}

/// Load every autoresponder keyword into the cache
async fn warm_keyword_cache(data: &Data) -> Result<(), Error> {
    let keywords = data.db.get_all_keywords().await?;
    for keyword in keywords {
        data.keywords.push(keyword);
    }
    if data.keywords.is_empty() {
        debug!("No autoresponder keywords configured");
    } else {
        info!("Keyword cache warmed with {} entries", data.keywords.len());
    }
    Ok(())
}
