pub use self::{config::BotConfig, context::Context, events::event_loop};

pub mod commands;
pub mod logging;

mod config;
mod context;
mod events;
