// Command modules
mod gostudy;
mod practice;
mod user_info;

use crate::registry::{ContextMenu, SlashCommand};

/// Every slash command shipped with the bot
pub fn all_commands() -> Vec<Box<dyn SlashCommand>> {
    vec![Box::new(practice::Practice), Box::new(gostudy::GoStudy)]
}

/// Every context menu shipped with the bot
pub fn all_menus() -> Vec<Box<dyn ContextMenu>> {
    vec![Box::new(user_info::UserInfo)]
}
