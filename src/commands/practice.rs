use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
};
use serenity::async_trait;

use crate::models::{Data, Error};
use crate::registry::SlashCommand;
use crate::tasks::windows::now_epoch_ms;
use crate::utils::messages::{ephemeral_reply, format_success};
use crate::utils::options::{int_option, str_option};

/// `/practice` queues a question for the invoking channel; the delivery loop
/// posts it once its time comes
pub struct Practice;

#[async_trait]
impl SlashCommand for Practice {
    fn name(&self) -> &'static str {
        "practice"
    }

    fn definition(&self) -> CreateCommand {
        CreateCommand::new(self.name())
            .description("Queue a practice question for this channel")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "question",
                    "The question to post",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "delay",
                    "Minutes to wait before posting",
                )
                .min_int_value(0)
                .max_int_value(1440),
            )
    }

    async fn run(
        &self,
        ctx: &Context,
        data: &Data,
        interaction: &CommandInteraction,
    ) -> Result<(), Error> {
        let options = &interaction.data.options;
        let question =
            str_option(options, "question").ok_or("Missing required option 'question'")?;
        let delay_minutes = int_option(options, "delay").unwrap_or(0);

        let send_time = (now_epoch_ms() + delay_minutes * 60_000).to_string();
        data.db
            .insert_practice_question(interaction.channel_id, question, &send_time)
            .await?;

        let note = if delay_minutes > 0 {
            format!(
                "Question queued, it will be posted in {} minutes.",
                delay_minutes
            )
        } else {
            "Question queued, it will be posted shortly.".to_string()
        };
        ephemeral_reply(ctx, interaction, format_success(&note)).await
    }
}
