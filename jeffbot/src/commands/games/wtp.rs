use std::sync::Arc;

use eyre::Result;
use twilight_model::channel::Message;

use super::play::{clue, play};
use crate::core::{
    commands::prefix::{Args, CommandResult, PrefixCommand},
    Context,
};

pub static WTP_PREFIX: PrefixCommand = PrefixCommand {
    names: &["wtp", "whosthat"],
    desc: "Whose that Pokémon?",
    usage: Some("[guess]"),
    examples: &["", "pikachu", "\"mr. mime\""],
    exec: wtp_prefix,
};

pub static WTPCLUE_PREFIX: PrefixCommand = PrefixCommand {
    names: &["wtpclue", "wtphint"],
    desc: "Get a hint for the Pokémon's name",
    usage: None,
    examples: &[],
    exec: wtpclue_prefix,
};

fn wtp_prefix<'f>(ctx: Arc<Context>, msg: &'f Message, args: Args<'f>) -> CommandResult<'f> {
    Box::pin(wtp(ctx, msg, args))
}

fn wtpclue_prefix<'f>(ctx: Arc<Context>, msg: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(wtpclue(ctx, msg))
}

async fn wtp(ctx: Arc<Context>, msg: &Message, args: Args<'_>) -> Result<()> {
    let hub = Arc::clone(&ctx.games.wtp);

    play(ctx, &hub, msg, args.guess()).await
}

async fn wtpclue(ctx: Arc<Context>, msg: &Message) -> Result<()> {
    let hub = Arc::clone(&ctx.games.wtp);

    clue(ctx, &hub, msg).await
}
