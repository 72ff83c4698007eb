pub use self::{embed::EmbedBuilder, message::MessageBuilder};

mod embed;
mod message;
