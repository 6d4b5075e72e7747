// src/discord/mod.rs
mod client;
mod events;
pub mod commands;
pub mod components;
pub mod embeds;
pub mod guild;
pub mod roles;
pub use client::{DiscordClient, ShardManagerContainer};
pub use events::EventHandler;
