use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
};
use serenity::async_trait;

use crate::models::{Data, Error};
use crate::registry::SlashCommand;
use crate::tasks::windows::now_epoch_ms;
use crate::utils::messages::{ephemeral_reply, format_error, format_success};
use crate::utils::options::int_option;

/// `/gostudy` gives the invoker the guild's focus-mute role for a while; the
/// mute-expiry loop lifts it again
pub struct GoStudy;

#[async_trait]
impl SlashCommand for GoStudy {
    fn name(&self) -> &'static str {
        "gostudy"
    }

    fn definition(&self) -> CreateCommand {
        CreateCommand::new(self.name())
            .description("Mute yourself to focus on studying for a while")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "duration",
                    "How long to stay muted, in minutes",
                )
                .required(true)
                .min_int_value(5)
                .max_int_value(480),
            )
    }

    async fn run(
        &self,
        ctx: &Context,
        data: &Data,
        interaction: &CommandInteraction,
    ) -> Result<(), Error> {
        let Some(guild_id) = interaction.guild_id else {
            return ephemeral_reply(
                ctx,
                interaction,
                format_error("This command only works in a server."),
            )
            .await;
        };
        let duration = int_option(&interaction.data.options, "duration")
            .ok_or("Missing required option 'duration'")?;

        let Some(role_id) = data
            .preferences_for(guild_id)
            .await?
            .and_then(|preferences| preferences.forced_mute_role_id)
        else {
            return ephemeral_reply(
                ctx,
                interaction,
                format_error("This server has no focus-mute role configured."),
            )
            .await;
        };

        // Persist the expiry before granting the role; the sweep can lift a
        // recorded mute without the role, never the reverse
        let expires_at = (now_epoch_ms() + duration * 60_000).to_string();
        data.db
            .upsert_forced_mute(interaction.user.id, guild_id, &expires_at)
            .await?;
        ctx.http
            .add_member_role(
                guild_id,
                interaction.user.id,
                role_id,
                Some("Focus mute started"),
            )
            .await?;

        ephemeral_reply(
            ctx,
            interaction,
            format_success(&format!(
                "You are muted for the next {} minutes. Happy studying!",
                duration
            )),
        )
        .await
    }
}
