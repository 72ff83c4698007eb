use std::{env, path::PathBuf};

use eyre::Result;
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<BotConfig> = OnceCell::new();

#[derive(Debug)]
pub struct BotConfig {
    pub tokens: Tokens,
    pub paths: Paths,
    pub geosniff_url: Box<str>,
    pub prefix: Box<str>,
}

#[derive(Debug)]
pub struct Paths {
    /// Names file and images of Whose that Pokémon
    pub wtp: PathBuf,
}

#[derive(Debug)]
pub struct Tokens {
    pub discord: Box<str>,
    pub google: Box<str>,
}

impl BotConfig {
    pub fn get() -> &'static Self {
        CONFIG
            .get()
            .expect("`BotConfig::init` must be called first")
    }

    pub fn init() -> Result<()> {
        let config = BotConfig {
            tokens: Tokens {
                discord: env_var("DISCORD_TOKEN")?,
                google: env_var("GOOGLE_API_TOKEN")?,
            },
            paths: Paths {
                wtp: env_var("WTP_PATH")?,
            },
            geosniff_url: env_var("GEOSNIFF_API_URL")?,
            prefix: env_var("PREFIX")?,
        };

        if CONFIG.set(config).is_err() {
            warn!("CONFIG was already set");
        }

        Ok(())
    }
}

trait EnvKind: Sized {
    const EXPECTED: &'static str;

    fn from_str(s: String) -> Result<Self, String>;
}

macro_rules! env_kind {
    ($($ty:ty: |$arg:ident| $impl:block,)*) => {
        $(
            impl EnvKind for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_str($arg: String) -> Result<Self, String> {
                    $impl
                }
            }
        )*
    };
}

env_kind! {
    Box<str>: |s| { (!s.is_empty()).then(|| s.into_boxed_str()).ok_or_else(String::new) },
    PathBuf: |s| { s.parse().map_err(|_| s) },
}

fn env_var<T: EnvKind>(name: &str) -> Result<T> {
    let value = env::var(name).map_err(|_| eyre!("missing env variable `{name}`"))?;

    T::from_str(value).map_err(|value| {
        eyre!(
            "failed to parse env variable `{name}={value}`; expected {expected}",
            expected = T::EXPECTED
        )
    })
}
