use serenity::all::{
    CommandInteraction, CommandType, Context, CreateCommand, CreateEmbed, CreateEmbedAuthor,
};
use serenity::async_trait;

use crate::models::{Data, Error};
use crate::registry::ContextMenu;
use crate::utils::embeds::format_epoch_date;
use crate::utils::messages::ephemeral_embed_reply;

/// "User Info" user menu: account and membership data at a glance
pub struct UserInfo;

#[async_trait]
impl ContextMenu for UserInfo {
    fn name(&self) -> &'static str {
        "User Info"
    }

    fn definition(&self) -> CreateCommand {
        CreateCommand::new(self.name()).kind(CommandType::User)
    }

    async fn run(
        &self,
        ctx: &Context,
        _data: &Data,
        interaction: &CommandInteraction,
    ) -> Result<(), Error> {
        let user_id = interaction
            .data
            .target_id
            .ok_or("User menu invoked without a target")?
            .to_user_id();
        let user = user_id.to_user(&ctx.http).await?;

        let member = match interaction.guild_id {
            Some(guild_id) => guild_id.member(&ctx.http, user_id).await.ok(),
            None => None,
        };

        let mut embed = CreateEmbed::new()
            .author(CreateEmbedAuthor::new(user.tag()).icon_url(user.face()))
            .field("ID", user_id.to_string(), true)
            .field(
                "Account created",
                format_epoch_date(user_id.created_at().unix_timestamp()),
                true,
            )
            .color(0x5865F2);
        if let Some(joined_at) = member.and_then(|member| member.joined_at) {
            embed = embed.field(
                "Joined this server",
                format_epoch_date(joined_at.unix_timestamp()),
                true,
            );
        }

        ephemeral_embed_reply(ctx, interaction, embed).await
    }
}
