/// Utility modules for common functionality
pub mod embeds;
pub mod messages;
pub mod options;
