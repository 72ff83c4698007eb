use std::sync::Arc;

use eyre::Result;
use jeffbot_util::constants::{GENERAL_ISSUE, ONLY_GUILDS};
use twilight_model::channel::Message;

use crate::{
    core::{BotConfig, Context},
    util::ChannelExt,
};

use self::parse::Invoke;

mod parse;

#[derive(Debug)]
enum ProcessResult {
    Success,
    NoDM,
}

pub async fn handle_message(ctx: Arc<Context>, msg: Message) {
    // Ignore bots and webhooks
    if msg.author.bot || msg.webhook_id.is_some() {
        return;
    }

    let prefix = BotConfig::get().prefix.as_ref();

    let Some(content) = msg.content.strip_prefix(prefix) else {
        return;
    };

    // Parse msg content for commands
    let Some(invoke) = Invoke::parse(content) else {
        return;
    };

    let name = invoke.cmd.name();
    let location = msg
        .guild_id
        .map_or_else(|| "Private".to_owned(), |guild| guild.to_string());
    info!("[{location}] {} used prefix command `{name}`", msg.author.name);

    match process_command(ctx, invoke, &msg).await {
        Ok(ProcessResult::Success) => info!("Processed command `{name}`"),
        Ok(result) => info!("Command `{name}` was not processed: {result:?}"),
        Err(err) => {
            let wrap = format!("Failed to process prefix command `{name}`");
            error!("{:?}", err.wrap_err(wrap));
        }
    }
}

async fn process_command<'m>(
    ctx: Arc<Context>,
    invoke: Invoke<'m>,
    msg: &'m Message,
) -> Result<ProcessResult> {
    let Invoke { cmd, args } = invoke;

    // Only in guilds
    if msg.guild_id.is_none() {
        msg.error(&ctx, ONLY_GUILDS).await?;

        return Ok(ProcessResult::NoDM);
    }

    let exec = (cmd.exec)(Arc::clone(&ctx), msg, args).await;

    if let Err(err) = exec {
        let _ = msg.error(&ctx, GENERAL_ISSUE).await;

        return Err(err);
    }

    Ok(ProcessResult::Success)
}
