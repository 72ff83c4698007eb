use std::{collections::VecDeque, path::PathBuf};

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use jeffbot_model::CreatureEntry;
use parking_lot::Mutex;
use rand::Rng;
use twilight_model::http::attachment::Attachment;

use super::{Clue, GameAnswer, GameConfig, GameVariant};

pub use self::hints::NameHints;

mod hints;

const NAMES_FILE: &str = "wtp_names.json";
const IMAGES_DIR: &str = "poke_imgs";
const SILHOUETTES_DIR: &str = "poke_sils";

/// The creature to guess in a round of Whose that Pokémon.
pub struct Pokemon {
    entry: CreatureEntry,
    hints: Mutex<NameHints>,
}

impl Pokemon {
    pub fn new(entry: CreatureEntry) -> Self {
        let hints = NameHints::new(&hint_name(&entry));

        Self {
            entry,
            hints: Mutex::new(hints),
        }
    }

    pub fn number(&self) -> u32 {
        self.entry.number
    }

    /// English name if available, the dex number otherwise.
    pub fn name(&self) -> String {
        match self.entry.english_name() {
            Some(name) => capitalize(name),
            None => format!("#{}", self.entry.number),
        }
    }
}

impl GameAnswer for Pokemon {
    fn acceptable_guesses(&self) -> Vec<&str> {
        self.entry.names.values().map(AsRef::as_ref).collect()
    }
}

/// Name the hints are built from.
fn hint_name(entry: &CreatureEntry) -> String {
    entry
        .english_name()
        .or_else(|| entry.names.values().next().map(AsRef::as_ref))
        .map_or_else(|| entry.number.to_string(), str::to_lowercase)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct WhoseThatPokemon {
    config: GameConfig,
    assets: PathBuf,
    creatures: Box<[CreatureEntry]>,
    previous: Mutex<VecDeque<u32>>,
}

impl WhoseThatPokemon {
    /// Loads all creatures from the names file inside `assets`.
    pub async fn load(assets: PathBuf) -> Result<Self> {
        let path = assets.join(NAMES_FILE);

        let bytes = tokio::fs::read(&path)
            .await
            .wrap_err_with(|| format!("Failed to read {path:?}"))?;

        let creatures: Vec<CreatureEntry> = serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("Failed to deserialize {path:?}"))?;

        ensure!(!creatures.is_empty(), "No creatures in {path:?}");
        info!(count = creatures.len(), "Loaded Whose that Pokémon names");

        Ok(Self::new(assets, creatures))
    }

    fn new(assets: PathBuf, creatures: Vec<CreatureEntry>) -> Self {
        Self {
            config: GameConfig::WTP,
            assets,
            creatures: creatures.into_boxed_slice(),
            previous: Mutex::new(VecDeque::new()),
        }
    }

    /// Random creature that was not picked in recent rounds.
    fn random_entry(&self) -> Option<&CreatureEntry> {
        if self.creatures.is_empty() {
            return None;
        }

        let mut rng = rand::thread_rng();
        let buffer_size = self.creatures.len() / 2;
        let mut previous = self.previous.lock();

        loop {
            let entry = &self.creatures[rng.gen_range(0..self.creatures.len())];

            if !previous.contains(&entry.number) {
                previous.push_front(entry.number);

                if previous.len() > buffer_size {
                    previous.pop_back();
                }

                return Some(entry);
            }
        }
    }

    async fn read_image(&self, dir: &str, pokemon: &Pokemon) -> Result<Vec<u8>> {
        let path = self
            .assets
            .join(dir)
            .join(format!("{}.png", pokemon.number()));

        tokio::fs::read(&path)
            .await
            .wrap_err_with(|| format!("Failed to read {path:?}"))
    }
}

#[async_trait]
impl GameVariant for WhoseThatPokemon {
    type Answer = Pokemon;

    const NAME: &'static str = "whose-that-pokemon";
    const TITLE: &'static str = "**Whose that Pokémon?**";
    const NOTHING_TO_GUESS: &'static str = "There's no game to guess on mate";

    fn config(&self) -> &GameConfig {
        &self.config
    }

    async fn fetch_answer(&self) -> Result<Pokemon> {
        let entry = self
            .random_entry()
            .cloned()
            .ok_or_else(|| eyre!("No creatures loaded"))?;

        debug!(number = entry.number, "Picked pokemon");

        Ok(Pokemon::new(entry))
    }

    async fn render(&self, pokemon: &Pokemon, reveal: bool) -> Result<Vec<Attachment>> {
        let (dir, filename) = if reveal {
            (IMAGES_DIR, format!("{}.png", hint_name(&pokemon.entry)))
        } else {
            (SILHOUETTES_DIR, "whose-that-pokemon.png".to_owned())
        };

        let bytes = self.read_image(dir, pokemon).await?;

        Ok(vec![Attachment::from_bytes(filename, bytes, 0)])
    }

    fn summary(&self, pokemon: &Pokemon) -> String {
        format!("It was **{}**", pokemon.name())
    }

    async fn clue(&self, pokemon: &Pokemon, _number: u8) -> Result<Option<Clue>> {
        let name = hint_name(&pokemon.entry);
        let hint = pokemon.hints.lock().next(&name);

        Ok(Some(Clue::text(hint)))
    }
}
