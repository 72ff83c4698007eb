use std::sync::Arc;

use eyre::{Result, WrapErr};
use jeffbot_util::{constants::THUMBS_DOWN, datetime::sec_to_minsec, CowUtils, MessageBuilder};
use time::OffsetDateTime;
use twilight_model::{
    channel::Message,
    id::{marker::GuildMarker, Id},
};

use crate::{
    core::Context,
    games::{AttemptOutcome, Clue, Dispatch, GameHub, GameVariant, SharedRound, StartError},
    util::{ChannelExt, MessageExt},
};

/// Starts a round or guesses on the running one, depending on `guess`.
pub(super) async fn play<V: GameVariant>(
    ctx: Arc<Context>,
    hub: &Arc<GameHub<V>>,
    msg: &Message,
    guess: Option<&str>,
) -> Result<()> {
    let Some(guild) = msg.guild_id else {
        return Ok(());
    };

    match hub.route(guild, guess) {
        Dispatch::AlreadyRunning => msg.plain_message(&ctx, V::ALREADY_RUNNING).await,
        Dispatch::NothingToGuess => msg.plain_message(&ctx, V::NOTHING_TO_GUESS).await,
        Dispatch::Guess { round, guess } => attempt(&ctx, hub, msg, &round, guess).await,
        Dispatch::Start => start(ctx, hub, msg, guild).await,
    }
}

async fn start<V: GameVariant>(
    ctx: Arc<Context>,
    hub: &Arc<GameHub<V>>,
    msg: &Message,
    guild: Id<GuildMarker>,
) -> Result<()> {
    // Another start may have won the race since routing
    let round = match hub.reserve(guild, msg.channel_id) {
        Ok(round) => round,
        Err(_) => return msg.plain_message(&ctx, V::ALREADY_RUNNING).await,
    };

    info!(game = V::NAME, %guild, "Starting round");

    if let Some(content) = V::PREPARING {
        if let Err(err) = msg.plain_message(&ctx, content).await {
            warn!(?err, "Failed to send preparation message");
        }
    }

    let answer = hub
        .prepare(&round)
        .await
        .map_err(StartError::into_report)?;

    let attachments = match hub.variant().render(&answer, false).await {
        Ok(attachments) => attachments,
        Err(err) => {
            hub.abandon(&round);

            return Err(err.wrap_err("failed to render round"));
        }
    };

    let on_timeout = {
        let ctx = Arc::clone(&ctx);
        let hub = Arc::clone(hub);
        let round = Arc::clone(&round);

        move || async move {
            if hub.time_out(&round) {
                info!(game = V::NAME, "Round timed out");
                finish(&ctx, &hub, &round, None).await;
            }
        }
    };

    // Guesses are accepted from here on
    if let Err(err) = hub.start(&round, on_timeout) {
        hub.abandon(&round);

        return Err(err).wrap_err("failed to start round");
    }

    let builder = MessageBuilder::new()
        .content(V::TITLE)
        .attachments(attachments);

    if let Err(err) = msg.channel_id.create_message(&ctx, builder).await {
        hub.abandon(&round);

        return Err(err.wrap_err("failed to announce round"));
    }

    let external_id = hub
        .variant()
        .record_start(msg.author.id, &answer)
        .await
        .unwrap_or_else(|err| {
            warn!(?err, game = V::NAME, "Failed to record round start");

            None
        });

    if let Some(id) = external_id {
        round.lock().set_external_id(id);
    }

    Ok(())
}

async fn attempt<V: GameVariant>(
    ctx: &Context,
    hub: &GameHub<V>,
    msg: &Message,
    round: &SharedRound<V::Answer>,
    guess: &str,
) -> Result<()> {
    let outcome = hub.attempt(round, guess);
    debug!(game = V::NAME, user = %msg.author.id, guess, ?outcome, "Evaluated attempt");

    if outcome == AttemptOutcome::Rejected {
        return Ok(());
    }

    let external_id = round.lock().external_id().cloned();

    if let Some(id) = external_id {
        let correct = outcome == AttemptOutcome::Correct;
        let guess = guess.cow_to_lowercase();
        let record = hub
            .variant()
            .record_attempt(&id, msg.author.id, &guess, correct);

        if let Err(err) = record.await {
            warn!(?err, game = V::NAME, "Failed to record attempt");
        }
    }

    if outcome == AttemptOutcome::Correct {
        finish(ctx, hub, round, Some(msg.author.name.as_str())).await;
    } else if let Err(err) = msg.react(ctx, THUMBS_DOWN).await {
        warn!(?err, "Failed to react to incorrect guess");
    }

    Ok(())
}

/// Announces the winner if any and reveals the answer.
async fn finish<V: GameVariant>(
    ctx: &Context,
    hub: &GameHub<V>,
    round: &SharedRound<V::Answer>,
    winner: Option<&str>,
) {
    let (guild, channel, answer, external_id) = {
        let round = round.lock();

        let elapsed = round
            .started_at()
            .map_or(0, |start| (OffsetDateTime::now_utc() - start).whole_seconds());

        debug!(
            game = V::NAME,
            elapsed,
            clues = round.clue_count(),
            total = round.total_duration().as_secs(),
            "Finishing round"
        );

        (
            round.guild(),
            round.channel(),
            round.answer(),
            round.external_id().cloned(),
        )
    };

    if let Some(winner) = winner {
        let content = format!("**{winner}** is the very best!");

        if let Err(err) = channel.plain_message(ctx, &content).await {
            warn!(?err, "Failed to announce winner");
        }
    }

    if let Some(answer) = answer {
        let mut builder = MessageBuilder::new().content(hub.variant().summary(&answer));

        match hub.variant().render(&answer, true).await {
            Ok(attachments) => builder = builder.attachments(attachments),
            Err(err) => warn!(?err, game = V::NAME, "Failed to render reveal"),
        }

        if let Err(err) = channel.create_message(ctx, builder).await {
            warn!(?err, "Failed to reveal answer");
        }
    }

    if let Some(id) = external_id {
        if let Err(err) = hub.variant().record_end(&id).await {
            warn!(?err, game = V::NAME, "Failed to record round end");
        }
    }

    info!(game = V::NAME, %guild, winner, "Round complete");
}

/// Hands out the next clue of the guild's running round.
pub(super) async fn clue<V: GameVariant>(
    ctx: Arc<Context>,
    hub: &Arc<GameHub<V>>,
    msg: &Message,
) -> Result<()> {
    let Some(guild) = msg.guild_id else {
        return Ok(());
    };

    let (round, grant) = match hub.request_clue(guild) {
        Some(Ok(granted)) => granted,
        Some(Err(rejection)) => return msg.plain_message(&ctx, &rejection.to_string()).await,
        None => return msg.plain_message(&ctx, V::NOTHING_TO_GUESS).await,
    };

    debug!(game = V::NAME, %guild, number = grant.number, "Granted clue");

    let footer = format!(
        "+{}s, {} left",
        grant.extra.as_secs(),
        sec_to_minsec(grant.remaining.as_secs() as u32)
    );

    let Some(Clue {
        content,
        attachments,
    }) = hub.produce_clue(&round, &grant).await?
    else {
        return Ok(());
    };

    let builder = MessageBuilder::new()
        .content(format!("**Clue #{}:** {content}\n*{footer}*", grant.number))
        .attachments(attachments);

    msg.channel_id.create_message(&ctx, builder).await
}
