use std::{collections::BTreeMap, fmt::Write, sync::Arc};

use eyre::Result;
use jeffbot_util::{string_cmp::levenshtein_distance, CowUtils, EmbedBuilder, MessageBuilder};
use twilight_model::channel::Message;

use crate::{
    core::{
        commands::prefix::{Args, CommandResult, PrefixCommand, PrefixCommands},
        BotConfig, Context,
    },
    util::ChannelExt,
};

pub static HELP_PREFIX: PrefixCommand = PrefixCommand {
    names: &["help", "h"],
    desc: "List all commands or explain one of them",
    usage: Some("[command]"),
    examples: &["", "sniff"],
    exec: help_prefix,
};

fn help_prefix<'f>(ctx: Arc<Context>, msg: &'f Message, mut args: Args<'f>) -> CommandResult<'f> {
    let name = args.next();

    Box::pin(help(ctx, msg, name))
}

async fn help(ctx: Arc<Context>, msg: &Message, name: Option<&str>) -> Result<()> {
    let prefix = BotConfig::get().prefix.as_ref();

    let Some(name) = name else {
        let embed = command_list(prefix);
        let builder = MessageBuilder::new().embed(embed);

        return msg.create_message(&ctx, builder).await;
    };

    let lowercase = name.cow_to_ascii_lowercase();
    let name = lowercase.strip_prefix(prefix).unwrap_or(lowercase.as_ref());

    match PrefixCommands::get().command(name) {
        Some(cmd) => {
            let builder = MessageBuilder::new().embed(command_help(prefix, cmd));

            msg.create_message(&ctx, builder).await
        }
        None => {
            let dists = PrefixCommands::get()
                .iter()
                .flat_map(|cmd| cmd.names.iter().copied())
                .filter_map(|cmd_name| {
                    let (dist, _) = levenshtein_distance(name, cmd_name);

                    (dist < 4).then_some((dist, cmd_name))
                })
                .collect();

            msg.error(&ctx, &failed_message_content(dists)).await
        }
    }
}

fn command_list(prefix: &str) -> EmbedBuilder {
    let mut description = String::with_capacity(256);

    for cmd in PrefixCommands::get().iter() {
        let _ = write!(description, "`{prefix}{}", cmd.name());

        if let Some(usage) = cmd.usage {
            let _ = write!(description, " {usage}");
        }

        let _ = writeln!(description, "`: {}", cmd.desc);
    }

    EmbedBuilder::new()
        .title("Jeff's commands")
        .description(description)
        .footer(format!("Use {prefix}help [command] for more info"))
}

fn command_help(prefix: &str, cmd: &PrefixCommand) -> EmbedBuilder {
    let mut description = format!("{}\n\n", cmd.desc);

    let _ = write!(description, "**Usage:** `{prefix}{}", cmd.name());

    if let Some(usage) = cmd.usage {
        let _ = write!(description, " {usage}");
    }

    description.push('`');

    let mut examples = cmd.examples.iter().map(|example| {
        if example.is_empty() {
            format!("`{prefix}{}`", cmd.name())
        } else {
            format!("`{prefix}{} {example}`", cmd.name())
        }
    });

    if let Some(example) = examples.next() {
        let _ = write!(description, "\n**Examples:** {example}");

        for example in examples {
            let _ = write!(description, ", {example}");
        }
    }

    if cmd.names.len() > 1 {
        description.push_str("\n**Aliases:** ");
        let mut aliases = cmd.names[1..].iter();

        if let Some(alias) = aliases.next() {
            let _ = write!(description, "`{alias}`");

            for alias in aliases {
                let _ = write!(description, ", `{alias}`");
            }
        }
    }

    EmbedBuilder::new().title(cmd.name()).description(description)
}

fn failed_message_content(dists: BTreeMap<usize, &'static str>) -> String {
    let mut names = dists.values().take(5);

    if let Some(name) = names.next() {
        let mut content = format!("Did you mean `{name}`");

        for name in names {
            let _ = write!(content, ", `{name}`");
        }

        content.push('?');

        content
    } else {
        "There is no such command".to_owned()
    }
}
