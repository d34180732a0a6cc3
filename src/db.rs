use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::models::{
    ChannelLockdown, ForcedMute, GuildPreferences, Keyword, PracticeQuestion, StickyMessage,
};

/// Database connection pool wrapper
///
/// Handles all database operations for the bot: sticky-message and
/// channel-lockdown windows, guild preferences, keywords, focus mutes and
/// queued practice questions.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection and run migrations
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;

        info!("Database connected and migrations completed");
        Ok(db)
    }

    /// Run database migrations to create tables
    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        // Window timestamps are epoch milliseconds stored as text, written by
        // external tooling. They are parsed on every poller pass.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sticky_messages (
                id SERIAL PRIMARY KEY,
                channel_id BIGINT NOT NULL,
                message_id BIGINT NOT NULL,
                embeds TEXT NOT NULL,
                stick_time TEXT NOT NULL,
                unstick_time TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channel_lockdowns (
                channel_id BIGINT PRIMARY KEY,
                start_timestamp TEXT NOT NULL,
                end_timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_preferences (
                guild_id BIGINT PRIMARY KEY,
                botlog_channel_id BIGINT,
                forced_mute_role_id BIGINT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS keywords (
                id SERIAL PRIMARY KEY,
                guild_id BIGINT NOT NULL,
                keyword TEXT NOT NULL,
                response TEXT NOT NULL,
                image_link TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS forced_mutes (
                user_id BIGINT NOT NULL,
                guild_id BIGINT NOT NULL,
                expires_at TEXT NOT NULL,
                PRIMARY KEY (user_id, guild_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS practice_questions (
                id SERIAL PRIMARY KEY,
                channel_id BIGINT NOT NULL,
                question TEXT NOT NULL,
                send_time TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Sticky-message methods

    /// Get all sticky-message records
    pub async fn get_all_sticky_messages(&self) -> Result<Vec<StickyMessage>, sqlx::Error> {
        let rows: Vec<(i32, i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT id, channel_id, message_id, embeds, stick_time, unstick_time FROM sticky_messages",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, channel_id, message_id, embeds, stick_time, unstick_time)| StickyMessage {
                    id,
                    channel_id: ChannelId::new(channel_id as u64),
                    message_id: MessageId::new(message_id as u64),
                    embeds,
                    stick_time,
                    unstick_time,
                },
            )
            .collect())
    }

    /// Point a sticky record at a newly posted message
    pub async fn update_sticky_message_id(
        &self,
        id: i32,
        message_id: MessageId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sticky_messages SET message_id = $1 WHERE id = $2")
            .bind(message_id.get() as i64)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove a sticky record once its window has closed
    pub async fn delete_sticky_message(&self, message_id: MessageId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sticky_messages WHERE message_id = $1")
            .bind(message_id.get() as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Channel-lockdown methods

    /// Get all channel-lockdown records
    pub async fn get_all_channel_lockdowns(&self) -> Result<Vec<ChannelLockdown>, sqlx::Error> {
        let rows: Vec<(i64, String, String)> = sqlx::query_as(
            "SELECT channel_id, start_timestamp, end_timestamp FROM channel_lockdowns",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(channel_id, start_timestamp, end_timestamp)| ChannelLockdown {
                channel_id: ChannelId::new(channel_id as u64),
                start_timestamp,
                end_timestamp,
            })
            .collect())
    }

    /// Remove a lockdown record once its window has closed
    pub async fn delete_channel_lockdown(&self, channel_id: ChannelId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM channel_lockdowns WHERE channel_id = $1")
            .bind(channel_id.get() as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Guild-preference methods

    /// Get the preferences configured for a guild
    pub async fn get_guild_preferences(
        &self,
        guild_id: GuildId,
    ) -> Result<Option<GuildPreferences>, sqlx::Error> {
        let result: Option<(Option<i64>, Option<i64>)> = sqlx::query_as(
            "SELECT botlog_channel_id, forced_mute_role_id FROM guild_preferences WHERE guild_id = $1",
        )
        .bind(guild_id.get() as i64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.map(|(botlog_channel_id, forced_mute_role_id)| GuildPreferences {
            botlog_channel_id: botlog_channel_id.map(|id| ChannelId::new(id as u64)),
            forced_mute_role_id: forced_mute_role_id.map(|id| RoleId::new(id as u64)),
        }))
    }

    // Keyword methods

    /// Get all autoresponder keywords across guilds
    pub async fn get_all_keywords(&self) -> Result<Vec<Keyword>, sqlx::Error> {
        let rows: Vec<(i64, String, String, Option<String>)> =
            sqlx::query_as("SELECT guild_id, keyword, response, image_link FROM keywords")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(guild_id, keyword, response, image_link)| Keyword {
                guild_id: GuildId::new(guild_id as u64),
                keyword,
                response,
                image_link,
            })
            .collect())
    }

    // Focus-mute methods

    /// Record or extend a focus mute
    pub async fn upsert_forced_mute(
        &self,
        user_id: UserId,
        guild_id: GuildId,
        expires_at: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO forced_mutes (user_id, guild_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, guild_id)
            DO UPDATE SET expires_at = $3
            "#,
        )
        .bind(user_id.get() as i64)
        .bind(guild_id.get() as i64)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get all focus mutes
    pub async fn get_all_forced_mutes(&self) -> Result<Vec<ForcedMute>, sqlx::Error> {
        let rows: Vec<(i64, i64, String)> =
            sqlx::query_as("SELECT user_id, guild_id, expires_at FROM forced_mutes")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, guild_id, expires_at)| ForcedMute {
                user_id: UserId::new(user_id as u64),
                guild_id: GuildId::new(guild_id as u64),
                expires_at,
            })
            .collect())
    }

    /// Remove a focus mute once it has been lifted
    pub async fn delete_forced_mute(
        &self,
        user_id: UserId,
        guild_id: GuildId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM forced_mutes WHERE user_id = $1 AND guild_id = $2")
            .bind(user_id.get() as i64)
            .bind(guild_id.get() as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Practice-question methods

    /// Queue a practice question for later delivery
    pub async fn insert_practice_question(
        &self,
        channel_id: ChannelId,
        question: &str,
        send_time: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO practice_questions (channel_id, question, send_time) VALUES ($1, $2, $3)",
        )
        .bind(channel_id.get() as i64)
        .bind(question)
        .bind(send_time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get all queued practice questions
    pub async fn get_all_practice_questions(&self) -> Result<Vec<PracticeQuestion>, sqlx::Error> {
        let rows: Vec<(i32, i64, String, String)> =
            sqlx::query_as("SELECT id, channel_id, question, send_time FROM practice_questions")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, channel_id, question, send_time)| PracticeQuestion {
                id,
                channel_id: ChannelId::new(channel_id as u64),
                question,
                send_time,
            })
            .collect())
    }

    /// Remove a practice question once it has been delivered
    pub async fn delete_practice_question(&self, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM practice_questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
