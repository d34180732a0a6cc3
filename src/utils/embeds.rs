use chrono::DateTime;
use serenity::all::{ChannelId, CreateEmbed, CreateEmbedAuthor, UserId};

/// Inputs for the one-time startup summary embed
pub struct StartupSummary {
    pub bot_tag: String,
    pub bot_face: String,
    pub guild_name: String,
    pub guild_created: String,
    pub member_count: u64,
    pub text_channels: usize,
    pub voice_channels: usize,
    pub categories: usize,
    pub command_count: usize,
    pub menu_count: usize,
}

/// Embed posted to the error-logs channel when the bot comes up
pub fn startup_summary_embed(summary: &StartupSummary) -> CreateEmbed {
    CreateEmbed::new()
        .author(CreateEmbedAuthor::new(&summary.bot_tag).icon_url(&summary.bot_face))
        .title("Bot is up")
        .description(format!(
            "Serving **{}** ({} members, created {})",
            summary.guild_name, summary.member_count, summary.guild_created
        ))
        .field("Text channels", summary.text_channels.to_string(), true)
        .field("Voice channels", summary.voice_channels.to_string(), true)
        .field("Categories", summary.categories.to_string(), true)
        .field(
            "Handlers",
            format!(
                "{} commands, {} menus",
                summary.command_count, summary.menu_count
            ),
            true,
        )
        .color(0x57F287)
}

/// Embed posted to a guild's botlog channel when an interaction handler fails
pub fn error_report_embed(channel_id: ChannelId, user_id: UserId, error: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Unhandled interaction error")
        .description(format!(
            "Channel: <#{}>\nUser: <@{}>\nError: {}",
            channel_id, user_id, error
        ))
        .color(0xED4245)
}

/// Format an epoch-seconds timestamp as dd/mm/yyyy
pub fn format_epoch_date(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_seconds_as_day_month_year() {
        assert_eq!(format_epoch_date(0), "01/01/1970");
        assert_eq!(format_epoch_date(1_735_689_600), "01/01/2025");
    }

    #[test]
    fn out_of_range_timestamp_falls_back() {
        assert_eq!(format_epoch_date(i64::MAX), "unknown");
    }
}
