use std::time::Duration;

/// Activity text shown in the bot's presence
pub const PRESENCE_WATCHING: &str = "over the study rooms";

/// How often queued practice questions are checked for delivery
pub const PRACTICE_QUESTION_PERIOD: Duration = Duration::from_millis(3500);

/// How often expired focus mutes are lifted
pub const FORCED_MUTE_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// How often sticky-message windows are reconciled with the cache
pub const STICKY_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// How often channel-lockdown windows are enforced
pub const LOCKDOWN_REFRESH_PERIOD: Duration = Duration::from_secs(120);

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "proctor_rs=info";
