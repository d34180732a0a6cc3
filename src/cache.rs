use dashmap::DashMap;
use serenity::all::{ChannelId, GuildId};

use crate::models::{CachedStickyMessage, GuildPreferences, Keyword};

/// Sticky-message windows currently active, keyed by record id
///
/// The refresh pass owns the contents; the message handler only reads through
/// [`StickyMessageCache::find_by_channel`] and rewrites entries after a
/// repost.
#[derive(Default)]
pub struct StickyMessageCache {
    entries: DashMap<i32, CachedStickyMessage>,
}

impl StickyMessageCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert or overwrite the entry for a record
    pub fn insert(&self, id: i32, entry: CachedStickyMessage) {
        self.entries.insert(id, entry);
    }

    /// Remove the entry for a record; removing an absent entry is a no-op
    pub fn remove(&self, id: i32) {
        self.entries.remove(&id);
    }

    /// Find the active window for a channel, if any
    pub fn find_by_channel(&self, channel_id: ChannelId) -> Option<(i32, CachedStickyMessage)> {
        self.entries
            .iter()
            .find(|entry| entry.channel_id == channel_id)
            .map(|entry| (*entry.key(), entry.value().clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Autoresponder keywords grouped by guild, loaded once at startup
#[derive(Default)]
pub struct KeywordCache {
    entries: DashMap<GuildId, Vec<Keyword>>,
}

impl KeywordCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Append a keyword to its guild's list
    pub fn push(&self, keyword: Keyword) {
        self.entries
            .entry(keyword.guild_id)
            .or_default()
            .push(keyword);
    }

    /// All keywords registered for a guild
    pub fn for_guild(&self, guild_id: GuildId) -> Vec<Keyword> {
        self.entries
            .get(&guild_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Total keyword count across guilds
    pub fn len(&self) -> usize {
        self.entries.iter().map(|entry| entry.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guild preferences, filled on demand by the read-through lookup
#[derive(Default)]
pub struct GuildPreferencesCache {
    entries: DashMap<GuildId, GuildPreferences>,
}

impl GuildPreferencesCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, guild_id: GuildId) -> Option<GuildPreferences> {
        self.entries.get(&guild_id).map(|entry| entry.clone())
    }

    pub fn insert(&self, guild_id: GuildId, preferences: GuildPreferences) {
        self.entries.insert(guild_id, preferences);
    }
}
