use tracing::{debug, warn};

use crate::models::{CachedStickyMessage, Data, Error, StickyMessage};
use crate::tasks::windows::{WindowState, classify_window, now_epoch_ms, parse_epoch_ms};

/// What the refresh pass does with one sticky record
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StickyTransition {
    /// Window is open: mirror the record into the cache
    Activate(CachedStickyMessage),
    /// Window has closed: drop the record and any cache entry
    Expire,
    /// Window has not opened yet
    Keep,
    /// Timestamps are unreadable
    Skip,
}

/// Decide the store/cache transition for one sticky record
pub fn plan_sticky_transition(record: &StickyMessage, now_ms: i64) -> StickyTransition {
    let (Some(start), Some(end)) = (
        parse_epoch_ms(&record.stick_time),
        parse_epoch_ms(&record.unstick_time),
    ) else {
        return StickyTransition::Skip;
    };

    match classify_window(start, end, now_ms) {
        WindowState::Active => StickyTransition::Activate(CachedStickyMessage {
            channel_id: record.channel_id,
            message_id: record.message_id,
            embeds: record.embeds.clone(),
        }),
        WindowState::Expired => StickyTransition::Expire,
        WindowState::Pending => StickyTransition::Keep,
    }
}

/// One sticky refresh pass: reconcile every record against the cache
///
/// Runs every minute. Active windows are upserted into the cache so the
/// message handler can repost them; closed windows are deleted from the
/// store and evicted from the cache.
pub async fn refresh_sticky_messages(data: &Data) -> Result<(), Error> {
    let now_ms = now_epoch_ms();
    let records = data.db.get_all_sticky_messages().await?;

    for record in records {
        match plan_sticky_transition(&record, now_ms) {
            StickyTransition::Activate(entry) => {
                data.sticky_messages.insert(record.id, entry);
            }
            StickyTransition::Expire => {
                data.db.delete_sticky_message(record.message_id).await?;
                data.sticky_messages.remove(record.id);
                debug!(
                    "Sticky message {} in channel {} expired",
                    record.message_id, record.channel_id
                );
            }
            StickyTransition::Keep => {}
            StickyTransition::Skip => {
                warn!(
                    "Sticky record {} has unreadable timestamps ({:?}, {:?}), skipping",
                    record.id, record.stick_time, record.unstick_time
                );
            }
        }
    }

    if !data.sticky_messages.is_empty() {
        debug!("{} sticky windows active", data.sticky_messages.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::all::{ChannelId, MessageId};

    fn record(stick_time: &str, unstick_time: &str) -> StickyMessage {
        StickyMessage {
            id: 7,
            channel_id: ChannelId::new(10),
            message_id: MessageId::new(100),
            embeds: r#"[{"title":"Rules"}]"#.to_string(),
            stick_time: stick_time.to_string(),
            unstick_time: unstick_time.to_string(),
        }
    }

    #[test]
    fn open_window_activates_with_denormalized_fields() {
        let transition = plan_sticky_transition(&record("100", "200"), 150);

        let StickyTransition::Activate(entry) = transition else {
            panic!("expected activation");
        };
        assert_eq!(entry.channel_id, ChannelId::new(10));
        assert_eq!(entry.message_id, MessageId::new(100));
        assert_eq!(entry.embeds, r#"[{"title":"Rules"}]"#);
    }

    #[test]
    fn window_ending_now_still_activates() {
        let transition = plan_sticky_transition(&record("100", "150"), 150);
        assert!(matches!(transition, StickyTransition::Activate(_)));
    }

    #[test]
    fn closed_window_expires() {
        assert_eq!(
            plan_sticky_transition(&record("100", "149"), 150),
            StickyTransition::Expire
        );
    }

    #[test]
    fn future_window_is_kept_untouched() {
        assert_eq!(
            plan_sticky_transition(&record("200", "300"), 150),
            StickyTransition::Keep
        );
    }

    #[test]
    fn inverted_window_expires_once_its_end_passed() {
        assert_eq!(
            plan_sticky_transition(&record("300", "100"), 150),
            StickyTransition::Expire
        );
    }

    #[test]
    fn unreadable_timestamps_are_skipped() {
        assert_eq!(
            plan_sticky_transition(&record("soon", "200"), 150),
            StickyTransition::Skip
        );
        assert_eq!(
            plan_sticky_transition(&record("100", ""), 150),
            StickyTransition::Skip
        );
    }
}
