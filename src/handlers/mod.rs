/// Handler modules for Discord events and interactions
mod interaction;
mod message;
mod ready;

// Re-export main handler functions
pub use interaction::handle_interaction;
pub use message::handle_message;
pub use ready::handle_ready;
