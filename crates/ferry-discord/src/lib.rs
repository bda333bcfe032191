pub mod adapter;
pub mod allow;
pub mod commands;
pub mod error;
pub mod handler;
pub mod send;
pub mod typing;

pub use adapter::DiscordAdapter;
pub use error::DiscordError;
