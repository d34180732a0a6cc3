use serenity::all::Context;
use tracing::{info, warn};

use crate::models::{Data, Error};
use crate::tasks::windows::{now_epoch_ms, parse_epoch_ms};

/// One delivery pass: send every queued question whose time has come
pub async fn deliver_due_questions(ctx: &Context, data: &Data) -> Result<(), Error> {
    let now_ms = now_epoch_ms();
    let questions = data.db.get_all_practice_questions().await?;

    for question in questions {
        let Some(send_time) = parse_epoch_ms(&question.send_time) else {
            warn!(
                "Practice question {} has an unreadable send time ({:?}), skipping",
                question.id, question.send_time
            );
            continue;
        };
        if send_time > now_ms {
            continue;
        }

        question
            .channel_id
            .say(&ctx.http, question.question.as_str())
            .await?;
        data.db.delete_practice_question(question.id).await?;
        info!(
            "Delivered practice question {} to channel {}",
            question.id, question.channel_id
        );
    }

    Ok(())
}
