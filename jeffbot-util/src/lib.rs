mod builder;
mod cow;
mod hasher;

pub mod constants;
pub mod datetime;
pub mod string_cmp;

pub use self::{
    builder::{EmbedBuilder, MessageBuilder},
    cow::CowUtils,
    hasher::{IntHash, IntHasher},
};
