use serenity::all::{Context, CreateEmbed, CreateMessage, Embed, Message};
use tracing::{debug, error};

use crate::models::{CachedStickyMessage, Data, Error, Keyword};

/// React to a guild message: keyword autoresponses and sticky reposts
///
/// Bot authors are ignored wholesale so the bot never answers itself.
pub async fn handle_message(ctx: &Context, message: &Message, data: &Data) {
    if message.author.bot {
        return;
    }

    if let Err(e) = answer_keyword(ctx, message, data).await {
        error!(
            "Keyword response in channel {} failed: {}",
            message.channel_id, e
        );
    }
    if let Err(e) = repost_sticky(ctx, message, data).await {
        error!(
            "Sticky repost in channel {} failed: {}",
            message.channel_id, e
        );
    }
}

/// Find the keyword entry matching a message, if any
///
/// The whole message must equal the keyword, case-insensitively; partial
/// matches do not count.
pub fn match_keyword<'a>(keywords: &'a [Keyword], content: &str) -> Option<&'a Keyword> {
    let content = content.trim().to_lowercase();
    keywords
        .iter()
        .find(|keyword| keyword.keyword.to_lowercase() == content)
}

/// Compose the reply for a keyword hit
pub fn keyword_reply(keyword: &Keyword) -> String {
    match &keyword.image_link {
        Some(link) => format!("{}\n{}", keyword.response, link),
        None => keyword.response.clone(),
    }
}

async fn answer_keyword(ctx: &Context, message: &Message, data: &Data) -> Result<(), Error> {
    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };

    let keywords = data.keywords.for_guild(guild_id);
    if let Some(keyword) = match_keyword(&keywords, &message.content) {
        message
            .channel_id
            .say(&ctx.http, keyword_reply(keyword))
            .await?;
    }
    Ok(())
}

/// Decode the embed array stored on a sticky record
fn parse_stored_embeds(raw: &str) -> Result<Vec<CreateEmbed>, serde_json::Error> {
    let embeds: Vec<Embed> = serde_json::from_str(raw)?;
    Ok(embeds.into_iter().map(CreateEmbed::from).collect())
}

/// Keep an active sticky message at the bottom of its channel
///
/// The stored embeds are reposted beneath the newest message and the record
/// is pointed at the fresh copy, in the store and in the cache.
async fn repost_sticky(ctx: &Context, message: &Message, data: &Data) -> Result<(), Error> {
    let Some((id, entry)) = data.sticky_messages.find_by_channel(message.channel_id) else {
        return Ok(());
    };

    // Decode before deleting the previous copy; malformed stored embeds must
    // leave the channel untouched
    let embeds = parse_stored_embeds(&entry.embeds)?;

    // The previous copy may already be gone
    if let Err(e) = message
        .channel_id
        .delete_message(&ctx.http, entry.message_id)
        .await
    {
        debug!(
            "Could not delete previous sticky message {}: {}",
            entry.message_id, e
        );
    }

    let reposted = message
        .channel_id
        .send_message(&ctx.http, CreateMessage::new().embeds(embeds))
        .await?;

    data.db.update_sticky_message_id(id, reposted.id).await?;
    data.sticky_messages.insert(
        id,
        CachedStickyMessage {
            message_id: reposted.id,
            ..entry
        },
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::all::GuildId;

    fn keyword(word: &str, response: &str, image_link: Option<&str>) -> Keyword {
        Keyword {
            guild_id: GuildId::new(1),
            keyword: word.to_string(),
            response: response.to_string(),
            image_link: image_link.map(str::to_string),
        }
    }

    #[test]
    fn matches_whole_message_case_insensitively() {
        let keywords = vec![keyword("f=ma", "Newton's second law", None)];

        assert!(match_keyword(&keywords, "F=MA").is_some());
        assert!(match_keyword(&keywords, "  f=ma ").is_some());
    }

    #[test]
    fn partial_matches_do_not_count() {
        let keywords = vec![keyword("f=ma", "Newton's second law", None)];

        assert!(match_keyword(&keywords, "what does f=ma mean?").is_none());
        assert!(match_keyword(&keywords, "f=m").is_none());
    }

    #[test]
    fn no_keywords_means_no_match() {
        assert!(match_keyword(&[], "anything").is_none());
    }

    #[test]
    fn reply_appends_image_link_when_present() {
        let plain = keyword("osmosis", "Movement of water across a membrane", None);
        assert_eq!(keyword_reply(&plain), "Movement of water across a membrane");

        let illustrated = keyword(
            "osmosis",
            "Movement of water across a membrane",
            Some("https://example.com/osmosis.png"),
        );
        assert_eq!(
            keyword_reply(&illustrated),
            "Movement of water across a membrane\nhttps://example.com/osmosis.png"
        );
    }

    #[test]
    fn stored_embed_array_decodes() {
        let embeds =
            parse_stored_embeds(r#"[{"title":"Rules"},{"title":"Quiet hours"}]"#).unwrap();
        assert_eq!(embeds.len(), 2);
    }

    #[test]
    fn malformed_stored_embeds_are_an_error() {
        assert!(parse_stored_embeds("not json").is_err());
        assert!(parse_stored_embeds(r#"{"title":"Rules"}"#).is_err());
    }
}
