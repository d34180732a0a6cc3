use std::collections::HashMap;

use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};

use crate::cache::{GuildPreferencesCache, KeywordCache, StickyMessageCache};
use crate::db::Database;
use crate::registry::{self, ContextMenu, SlashCommand};
use crate::tasks::BackgroundTasks;

/// A message kept reposted at the bottom of a channel for a limited time.
///
/// `stick_time` and `unstick_time` are integer epoch milliseconds stored as
/// text; the refresh pass parses them on every pass.
#[derive(Clone, Debug)]
pub struct StickyMessage {
    pub id: i32,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    /// Raw JSON of the embed array, reposted verbatim
    pub embeds: String,
    pub stick_time: String,
    pub unstick_time: String,
}

/// A timed write-freeze on a channel or thread
#[derive(Clone, Debug)]
pub struct ChannelLockdown {
    pub channel_id: ChannelId,
    pub start_timestamp: String,
    pub end_timestamp: String,
}

/// Denormalized sticky-message data held in the fast-path cache while its
/// window is active
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedStickyMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub embeds: String,
}

/// An autoresponder entry, loaded once at startup
#[derive(Clone, Debug)]
pub struct Keyword {
    pub guild_id: GuildId,
    pub keyword: String,
    pub response: String,
    pub image_link: Option<String>,
}

/// Per-guild configuration; read-only from this bot's perspective
#[derive(Clone, Debug)]
pub struct GuildPreferences {
    pub botlog_channel_id: Option<ChannelId>,
    pub forced_mute_role_id: Option<RoleId>,
}

/// A self-imposed focus mute awaiting expiry
#[derive(Clone, Debug)]
pub struct ForcedMute {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub expires_at: String,
}

/// A queued practice question awaiting delivery
#[derive(Clone, Debug)]
pub struct PracticeQuestion {
    pub id: i32,
    pub channel_id: ChannelId,
    pub question: String,
    pub send_time: String,
}

/// Static configuration loaded from the environment
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub main_guild_id: GuildId,
    pub error_logs_channel_id: ChannelId,
    pub dev_guild_id: Option<GuildId>,
}

/// Bot state shared across all handlers
pub struct Data {
    /// Database connection
    pub db: Database,
    /// Static configuration
    pub config: BotConfig,
    /// Active sticky-message windows, keyed by record id
    pub sticky_messages: StickyMessageCache,
    /// Autoresponder keywords, grouped by guild
    pub keywords: KeywordCache,
    /// Guild preferences, filled on demand
    pub guild_preferences: GuildPreferencesCache,
    /// Slash-command handlers, keyed by command name; immutable once built
    pub commands: HashMap<&'static str, Box<dyn SlashCommand>>,
    /// Context-menu handlers, keyed by menu name; immutable once built
    pub menus: HashMap<&'static str, Box<dyn ContextMenu>>,
    /// Periodic maintenance loops
    pub tasks: BackgroundTasks,
}

impl Data {
    /// Create a new Data instance with the given database connection and
    /// handler sets
    pub fn new(
        db: Database,
        config: BotConfig,
        commands: Vec<Box<dyn SlashCommand>>,
        menus: Vec<Box<dyn ContextMenu>>,
    ) -> Self {
        Self {
            db,
            config,
            sticky_messages: StickyMessageCache::new(),
            keywords: KeywordCache::new(),
            guild_preferences: GuildPreferencesCache::new(),
            commands: registry::index_commands(commands),
            menus: registry::index_menus(menus),
            tasks: BackgroundTasks::new(),
        }
    }

    /// Look up a guild's preferences, falling back to the database and
    /// filling the cache on a miss
    pub async fn preferences_for(
        &self,
        guild_id: GuildId,
    ) -> Result<Option<GuildPreferences>, Error> {
        if let Some(preferences) = self.guild_preferences.get(guild_id) {
            return Ok(Some(preferences));
        }

        let fetched = self.db.get_guild_preferences(guild_id).await?;
        if let Some(preferences) = &fetched {
            self.guild_preferences.insert(guild_id, preferences.clone());
        }

        Ok(fetched)
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
