use serenity::all::{
    CommandInteraction, Context, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};

use crate::models::Error;

/// Format a failure message with emoji
pub fn format_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// Format a success message with emoji
pub fn format_success(message: &str) -> String {
    format!("✅ {}", message)
}

/// Truncate a long message with ellipsis
pub fn truncate_message(message: &str, max_length: usize) -> String {
    if message.len() <= max_length {
        message.to_string()
    } else if max_length < 3 {
        message.chars().take(max_length).collect()
    } else {
        let truncated: String = message.chars().take(max_length - 3).collect();
        format!("{}...", truncated)
    }
}

/// Reply to an interaction with an ephemeral text message
pub async fn ephemeral_reply(
    ctx: &Context,
    interaction: &CommandInteraction,
    content: impl Into<String>,
) -> Result<(), Error> {
    interaction
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Reply to an interaction with an ephemeral embed
pub async fn ephemeral_embed_reply(
    ctx: &Context,
    interaction: &CommandInteraction,
    embed: CreateEmbed,
) -> Result<(), Error> {
    interaction
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        assert_eq!(format_error("Something failed"), "❌ Something failed");
    }

    #[test]
    fn test_format_success() {
        assert_eq!(format_success("It worked"), "✅ It worked");
    }

    #[test]
    fn test_truncate_message_short() {
        assert_eq!(truncate_message("Hello", 10), "Hello");
    }

    #[test]
    fn test_truncate_message_long() {
        assert_eq!(
            truncate_message("This is a very long message", 10),
            "This is..."
        );
    }

    #[test]
    fn test_truncate_message_exact() {
        assert_eq!(truncate_message("Hello", 5), "Hello");
    }

    #[test]
    fn test_truncate_message_very_short_limit() {
        assert_eq!(truncate_message("Hello", 2), "He");
        assert_eq!(truncate_message("Hello", 0), "");
    }
}
