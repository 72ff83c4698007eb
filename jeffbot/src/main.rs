#[macro_use]
extern crate tracing;

#[macro_use]
extern crate eyre;

mod commands;
mod core;
mod games;
mod util;

use std::sync::Arc;

use eyre::{Result, WrapErr};
use tokio::{runtime::Builder as RuntimeBuilder, signal};

use crate::core::{event_loop, logging, BotConfig, Context};

fn main() {
    let runtime = RuntimeBuilder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Could not build runtime");

    if let Err(err) = dotenvy::dotenv() {
        panic!("Failed to prepare .env variables: {err}");
    }

    let _log_worker_guard = logging::init();

    if let Err(source) = runtime.block_on(async_main()) {
        error!(?source, "Critical error in main");
    }
}

async fn async_main() -> Result<()> {
    BotConfig::init().context("failed to initialize config")?;

    let (ctx, mut shard) = Context::new().await.context("failed to create context")?;
    let ctx = Arc::new(ctx);

    tokio::select! {
        _ = event_loop(Arc::clone(&ctx), &mut shard) => error!("Event loop ended"),
        res = signal::ctrl_c() => match res {
            Ok(_) => info!("Received Ctrl+C"),
            Err(err) => error!(?err, "Failed to await Ctrl+C"),
        }
    }

    let geosniff = ctx.games.geosniff.rounds().len();
    let wtp = ctx.games.wtp.rounds().len();
    info!(geosniff, wtp, "Shutting down, unfinished rounds are dropped");

    Ok(())
}
