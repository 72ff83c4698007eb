use std::sync::Arc;

use twilight_model::channel::Message;

use super::{Args, CommandResult};
use crate::core::Context;

pub struct PrefixCommand {
    pub names: &'static [&'static str],
    pub desc: &'static str,
    pub usage: Option<&'static str>,
    pub examples: &'static [&'static str],
    pub exec: for<'f> fn(Arc<Context>, &'f Message, Args<'f>) -> CommandResult<'f>,
}

impl PrefixCommand {
    pub fn name(&self) -> &str {
        self.names[0]
    }
}
