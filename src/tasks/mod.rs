pub mod lockdown;
pub mod manager;
pub mod mutes;
pub mod practice;
pub mod sticky;
pub mod windows;

pub use manager::BackgroundTasks;
