use serenity::all::{
    ChannelId, ChannelType, Context, EditThread, GuildChannel, PermissionOverwrite,
    PermissionOverwriteType, Permissions, ThreadMetadata,
};
use tracing::{debug, info, warn};

use crate::models::{Data, Error};
use crate::tasks::windows::{WindowState, classify_window, now_epoch_ms, parse_epoch_ms};

/// Permission bits withheld from @everyone while a channel is locked down
pub const LOCKDOWN_DENY: Permissions =
    Permissions::SEND_MESSAGES.union(Permissions::SEND_MESSAGES_IN_THREADS);

/// Plan the @everyone overwrite that freezes writes in a text channel
///
/// `base` is the @everyone role's guild-level permissions, `existing` the
/// channel's current @everyone overwrite if there is one. Returns the
/// allow/deny pair to write back, or `None` when sending is already denied.
/// Bits unrelated to sending are carried over unchanged.
pub fn plan_send_denial(
    base: Permissions,
    existing: Option<(Permissions, Permissions)>,
) -> Option<(Permissions, Permissions)> {
    let (allow, deny) = existing.unwrap_or((Permissions::empty(), Permissions::empty()));

    let effective = base.difference(deny).union(allow);
    if !effective.contains(Permissions::SEND_MESSAGES) {
        return None;
    }

    Some((allow.difference(LOCKDOWN_DENY), deny.union(LOCKDOWN_DENY)))
}

/// Whether a thread still needs its locked flag set
///
/// Thread kinds should always carry metadata; one without it counts as
/// unlocked.
pub fn thread_needs_lock(metadata: Option<&ThreadMetadata>) -> bool {
    !metadata.map(|metadata| metadata.locked).unwrap_or(false)
}

/// One lockdown pass: enforce every window against the live channel state
///
/// Runs every two minutes. Channels inside an open window are locked (threads
/// via the locked flag, text and forum channels via an @everyone overwrite);
/// records whose window has closed are deleted. Locking is idempotent, so a
/// channel that is already locked is left alone.
pub async fn refresh_channel_lockdowns(ctx: &Context, data: &Data) -> Result<(), Error> {
    let now_ms = now_epoch_ms();
    let records = data.db.get_all_channel_lockdowns().await?;

    for record in records {
        let (Some(start), Some(end)) = (
            parse_epoch_ms(&record.start_timestamp),
            parse_epoch_ms(&record.end_timestamp),
        ) else {
            warn!(
                "Lockdown record for channel {} has unreadable timestamps ({:?}, {:?}), skipping",
                record.channel_id, record.start_timestamp, record.end_timestamp
            );
            continue;
        };

        match classify_window(start, end, now_ms) {
            WindowState::Active => lock_channel(ctx, record.channel_id).await?,
            WindowState::Expired => {
                data.db.delete_channel_lockdown(record.channel_id).await?;
                debug!("Lockdown on channel {} ended", record.channel_id);
            }
            WindowState::Pending => {}
        }
    }

    Ok(())
}

/// Apply the lock state for one channel, doing nothing if already locked
async fn lock_channel(ctx: &Context, channel_id: ChannelId) -> Result<(), Error> {
    // Clone the channel out of the cache before any await
    let channel: GuildChannel = match ctx.cache.channel(channel_id) {
        Some(channel) => channel.clone(),
        None => {
            debug!("Channel {} not in cache, skipping lockdown", channel_id);
            return Ok(());
        }
    };

    match channel.kind {
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread => {
            if thread_needs_lock(channel.thread_metadata.as_ref()) {
                channel_id
                    .edit_thread(&ctx.http, EditThread::new().locked(true))
                    .await?;
                info!("Locked thread {}", channel_id);
            }
        }
        ChannelType::Text | ChannelType::News | ChannelType::Forum => {
            let everyone_id = channel.guild_id.everyone_role();

            let base = match ctx.cache.guild(channel.guild_id) {
                Some(guild) => guild.roles.get(&everyone_id).map(|role| role.permissions),
                None => None,
            };
            let Some(base) = base else {
                debug!(
                    "Guild for channel {} not in cache, skipping lockdown",
                    channel_id
                );
                return Ok(());
            };

            let existing = channel
                .permission_overwrites
                .iter()
                .find(|overwrite| overwrite.kind == PermissionOverwriteType::Role(everyone_id))
                .map(|overwrite| (overwrite.allow, overwrite.deny));

            if let Some((allow, deny)) = plan_send_denial(base, existing) {
                channel_id
                    .create_permission(
                        &ctx.http,
                        PermissionOverwrite {
                            allow,
                            deny,
                            kind: PermissionOverwriteType::Role(everyone_id),
                        },
                    )
                    .await?;
                info!("Locked channel {}", channel_id);
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denies_sending_when_base_permissions_allow_it() {
        let base = Permissions::SEND_MESSAGES | Permissions::VIEW_CHANNEL;

        let (allow, deny) = plan_send_denial(base, None).unwrap();
        assert_eq!(allow, Permissions::empty());
        assert_eq!(deny, LOCKDOWN_DENY);
    }

    #[test]
    fn leaves_channel_alone_when_sending_already_denied() {
        let base = Permissions::SEND_MESSAGES | Permissions::VIEW_CHANNEL;
        let existing = (Permissions::empty(), Permissions::SEND_MESSAGES);

        assert_eq!(plan_send_denial(base, Some(existing)), None);
    }

    #[test]
    fn leaves_channel_alone_when_base_never_allowed_sending() {
        let base = Permissions::VIEW_CHANNEL;

        assert_eq!(plan_send_denial(base, None), None);
    }

    #[test]
    fn overwrite_allow_overrides_restrictive_base() {
        let base = Permissions::VIEW_CHANNEL;
        let existing = (Permissions::SEND_MESSAGES, Permissions::empty());

        let (allow, deny) = plan_send_denial(base, Some(existing)).unwrap();
        assert_eq!(allow, Permissions::empty());
        assert_eq!(deny, LOCKDOWN_DENY);
    }

    #[test]
    fn unrelated_overwrite_bits_are_preserved() {
        let base = Permissions::SEND_MESSAGES | Permissions::VIEW_CHANNEL;
        let existing = (
            Permissions::ATTACH_FILES,
            Permissions::EMBED_LINKS | Permissions::ADD_REACTIONS,
        );

        let (allow, deny) = plan_send_denial(base, Some(existing)).unwrap();
        assert_eq!(allow, Permissions::ATTACH_FILES);
        assert_eq!(
            deny,
            Permissions::EMBED_LINKS | Permissions::ADD_REACTIONS | LOCKDOWN_DENY
        );
    }

    fn thread_metadata(locked: bool) -> ThreadMetadata {
        serde_json::from_value(serde_json::json!({
            "archived": false,
            "auto_archive_duration": 60,
            "archive_timestamp": null,
            "locked": locked,
            "create_timestamp": null
        }))
        .expect("valid thread metadata")
    }

    #[test]
    fn unlocked_thread_gets_the_lock_call() {
        assert!(thread_needs_lock(Some(&thread_metadata(false))));
    }

    #[test]
    fn locked_thread_is_not_locked_again() {
        assert!(!thread_needs_lock(Some(&thread_metadata(true))));
    }

    #[test]
    fn thread_without_metadata_counts_as_unlocked() {
        assert!(thread_needs_lock(None));
    }
}
