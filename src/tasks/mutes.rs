use serenity::all::Context;
use tracing::{info, warn};

use crate::models::{Data, Error, ForcedMute};
use crate::tasks::windows::{now_epoch_ms, parse_epoch_ms};

/// What the sweep does with one focus-mute record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MuteLift {
    /// Expiry reached: remove the role and drop the record
    Lift,
    /// Still running
    Wait,
    /// Expiry is unreadable
    Skip,
}

/// Decide what the sweep does with one focus-mute record
pub fn plan_mute_lift(mute: &ForcedMute, now_ms: i64) -> MuteLift {
    match parse_epoch_ms(&mute.expires_at) {
        None => MuteLift::Skip,
        Some(expires_at) if expires_at > now_ms => MuteLift::Wait,
        Some(_) => MuteLift::Lift,
    }
}

/// One expiry pass: lift every focus mute whose time is up
///
/// Role removal can fail when the member has already left the guild; the
/// record is dropped either way so a gone member cannot wedge the loop.
pub async fn lift_expired_mutes(ctx: &Context, data: &Data) -> Result<(), Error> {
    let now_ms = now_epoch_ms();
    let mutes = data.db.get_all_forced_mutes().await?;

    for mute in mutes {
        match plan_mute_lift(&mute, now_ms) {
            MuteLift::Wait => continue,
            MuteLift::Skip => {
                warn!(
                    "Focus mute for user {} in guild {} has an unreadable expiry ({:?}), skipping",
                    mute.user_id, mute.guild_id, mute.expires_at
                );
                continue;
            }
            MuteLift::Lift => {}
        }

        let preferences = data.preferences_for(mute.guild_id).await?;
        if let Some(role_id) = preferences.and_then(|p| p.forced_mute_role_id) {
            if let Err(e) = ctx
                .http
                .remove_member_role(mute.guild_id, mute.user_id, role_id, Some("Focus mute expired"))
                .await
            {
                warn!(
                    "Could not remove focus-mute role from user {} in guild {}: {}",
                    mute.user_id, mute.guild_id, e
                );
            }
        }

        data.db.delete_forced_mute(mute.user_id, mute.guild_id).await?;
        info!(
            "Focus mute for user {} in guild {} lifted",
            mute.user_id, mute.guild_id
        );
    }

    Ok(())
}
