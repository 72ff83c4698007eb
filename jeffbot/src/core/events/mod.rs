use std::sync::Arc;

use eyre::{Report, Result};
use twilight_gateway::{Event, Shard};

use self::message::handle_message;

use super::Context;

mod message;

pub async fn event_loop(ctx: Arc<Context>, shard: &mut Shard) {
    loop {
        let err = match shard.next_event().await {
            Ok(event) => {
                let ctx = Arc::clone(&ctx);
                let shard_id = shard.id().number();

                tokio::spawn(async move {
                    if let Err(err) = handle_event(ctx, event, shard_id).await {
                        error!("{:?}", err.wrap_err("Failed to handle event"));
                    }
                });

                continue;
            }
            Err(err) => err,
        };

        let is_fatal = err.is_fatal();
        error!("{:?}", Report::new(err).wrap_err("Event error"));

        if is_fatal {
            return;
        }
    }
}

async fn handle_event(ctx: Arc<Context>, event: Event, shard_id: u64) -> Result<()> {
    match event {
        Event::GatewayClose(Some(frame)) => {
            warn!(
                "Received closing frame for shard {shard_id}: reason={} (code {})",
                frame.reason, frame.code,
            )
        }
        Event::GatewayClose(None) => {
            warn!("Received closing frame for shard {shard_id}")
        }
        Event::GatewayInvalidateSession(true) => {
            warn!("Gateway has invalidated session for shard {shard_id}, but its reconnectable")
        }
        Event::GatewayInvalidateSession(false) => {
            warn!("Gateway has invalidated session for shard {shard_id}")
        }
        Event::GatewayReconnect => {
            info!("Gateway requested shard {shard_id} to reconnect")
        }
        Event::GuildCreate(e) => {
            debug!(guild = %e.id, name = %e.name, "Joined guild");
        }
        Event::MessageCreate(msg) => handle_message(ctx, msg.0).await,
        Event::Ready(ready) => {
            info!(
                guilds = ready.guilds.len(),
                "Shard {shard_id} is ready as {}",
                ready.user.name
            );
        }
        Event::Resumed => info!("Shard {shard_id} is resumed"),
        _ => {}
    }

    Ok(())
}
