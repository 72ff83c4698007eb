use std::{fmt::Write, sync::Arc};

use eyre::{Result, WrapErr};
use jeffbot_model::LeaderboardEntry;
use jeffbot_util::MessageBuilder;
use twilight_model::channel::Message;

use super::play::{clue, play};
use crate::{
    core::{
        commands::prefix::{Args, CommandResult, PrefixCommand},
        Context,
    },
    util::ChannelExt,
};

const LEADERBOARD_SIZE: usize = 20;

pub static SNIFF_PREFIX: PrefixCommand = PrefixCommand {
    names: &["sniff", "geosniff"],
    desc: "Guess where Jeff is sniffing around",
    usage: Some("[guess]"),
    examples: &["", "japan", "new york"],
    exec: sniff_prefix,
};

pub static SNIFFCLUE_PREFIX: PrefixCommand = PrefixCommand {
    names: &["sniffclue", "sniffhint"],
    desc: "Let Jeff wander off for a clue",
    usage: None,
    examples: &[],
    exec: sniffclue_prefix,
};

pub static SNIFFBOARD_PREFIX: PrefixCommand = PrefixCommand {
    names: &["sniffboard", "sniffleaderboard"],
    desc: "Show the best sniffers",
    usage: None,
    examples: &[],
    exec: sniffboard_prefix,
};

fn sniff_prefix<'f>(ctx: Arc<Context>, msg: &'f Message, args: Args<'f>) -> CommandResult<'f> {
    Box::pin(sniff(ctx, msg, args))
}

fn sniffclue_prefix<'f>(ctx: Arc<Context>, msg: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(sniffclue(ctx, msg))
}

fn sniffboard_prefix<'f>(ctx: Arc<Context>, msg: &'f Message, _: Args<'f>) -> CommandResult<'f> {
    Box::pin(sniffboard(ctx, msg))
}

async fn sniff(ctx: Arc<Context>, msg: &Message, args: Args<'_>) -> Result<()> {
    let hub = Arc::clone(&ctx.games.geosniff);

    play(ctx, &hub, msg, args.guess()).await
}

async fn sniffclue(ctx: Arc<Context>, msg: &Message) -> Result<()> {
    let hub = Arc::clone(&ctx.games.geosniff);

    clue(ctx, &hub, msg).await
}

async fn sniffboard(ctx: Arc<Context>, msg: &Message) -> Result<()> {
    let entries = ctx
        .client()
        .geosniff_leaderboard()
        .await
        .wrap_err("failed to get leaderboard")?;

    if entries.is_empty() {
        return msg.plain_message(&ctx, "Nobody went sniffing yet").await;
    }

    let content = format!("**Best sniffers**\n{}", leaderboard_table(&entries));
    let builder = MessageBuilder::new().content(content);

    msg.create_message(&ctx, builder).await
}

fn leaderboard_table(entries: &[LeaderboardEntry]) -> String {
    let entries = &entries[..entries.len().min(LEADERBOARD_SIZE)];

    let name_len = entries
        .iter()
        .map(|entry| entry.name.chars().count())
        .fold(4, usize::max);

    let mut table = String::with_capacity(8 + (entries.len() + 1) * (name_len + 30));
    table.push_str("```\n");

    let _ = writeln!(
        table,
        "{:>2}  {:<name_len$}  {:>6}  {:>4}  {:>6}",
        "#", "Name", "Played", "Won", "Points"
    );

    for (entry, i) in entries.iter().zip(1..) {
        let _ = writeln!(
            table,
            "{i:>2}  {:<name_len$}  {:>6}  {:>4}  {:>6}",
            entry.name, entry.played, entry.won, entry.points
        );
    }

    table.push_str("```");

    table
}
