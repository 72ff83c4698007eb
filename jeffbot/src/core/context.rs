use std::sync::Arc;

use eyre::{Result, WrapErr};
use jeffbot_client::Client as JeffClient;
use twilight_gateway::{Intents, Shard, ShardId};
use twilight_http::Client;

use crate::games::{geo::GeoSniff, wtp::WhoseThatPokemon, GameHub};

use super::BotConfig;

pub struct Context {
    pub http: Arc<Client>,
    pub games: Games,
    client: Arc<JeffClient>,
}

/// One hub per game variant.
pub struct Games {
    pub geosniff: Arc<GameHub<GeoSniff>>,
    pub wtp: Arc<GameHub<WhoseThatPokemon>>,
}

impl Context {
    /// Returns the client for the GeoSniff and Google APIs
    pub fn client(&self) -> &JeffClient {
        &self.client
    }

    pub async fn new() -> Result<(Self, Shard)> {
        let config = BotConfig::get();
        let discord_token = &config.tokens.discord;

        // Connect to the discord http client
        let http = Client::builder()
            .token(discord_token.to_string())
            .remember_invalid_token(false)
            .build();

        let http = Arc::new(http);

        let current_user = http
            .current_user()
            .await
            .wrap_err("failed to get current user")?
            .model()
            .await
            .wrap_err("failed to deserialize current user")?;

        info!(
            "Connecting to Discord as {}#{}...",
            current_user.name, current_user.discriminator
        );

        let client = Arc::new(JeffClient::new(
            &config.geosniff_url,
            &config.tokens.google,
        ));

        let wtp = WhoseThatPokemon::load(config.paths.wtp.clone())
            .await
            .wrap_err("failed to load whose that pokemon")?;

        let games = Games {
            geosniff: Arc::new(GameHub::new(GeoSniff::new(Arc::clone(&client)))),
            wtp: Arc::new(GameHub::new(wtp)),
        };

        let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;
        let shard = Shard::new(ShardId::ONE, discord_token.to_string(), intents);

        let ctx = Self {
            http,
            games,
            client,
        };

        Ok((ctx, shard))
    }
}
