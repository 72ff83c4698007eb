use std::pin::Pin;

use eyre::Result;
use futures::Future;
use once_cell::sync::OnceCell;
use radix_trie::{Trie, TrieCommon};

use crate::commands::{games::*, help::HELP_PREFIX};

pub use self::{args::Args, command::PrefixCommand};

mod args;
mod command;

macro_rules! prefix_trie {
    ( $( $cmd:ident ,)* ) => {
        let mut trie = Trie::new();

        $(
            for &name in $cmd.names {
                if trie.insert(name, &$cmd).is_some() {
                    panic!("duplicate prefix command `{name}`");
                }
            }
        )*

        PrefixCommands(trie)
    }
}

static PREFIX_COMMANDS: OnceCell<PrefixCommands> = OnceCell::new();

pub type CommandResult<'fut> = Pin<Box<dyn Future<Output = Result<()>> + 'fut + Send>>;

type PrefixTrie = Trie<&'static str, &'static PrefixCommand>;

pub struct PrefixCommands(PrefixTrie);

impl PrefixCommands {
    pub fn get() -> &'static Self {
        PREFIX_COMMANDS.get_or_init(|| {
            prefix_trie! {
                HELP_PREFIX,
                SNIFF_PREFIX,
                SNIFFBOARD_PREFIX,
                SNIFFCLUE_PREFIX,
                WTP_PREFIX,
                WTPCLUE_PREFIX,
            }
        })
    }

    pub fn command(&self, command: &str) -> Option<&'static PrefixCommand> {
        self.0.get(command).copied()
    }

    /// Every command once, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &'static PrefixCommand> + '_ {
        let mut cmds: Vec<_> = self.0.values().copied().collect();
        cmds.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        cmds.dedup_by(|a, b| a.name() == b.name());

        cmds.into_iter()
    }
}
