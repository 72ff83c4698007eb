use std::slice;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use jeffbot_util::{EmbedBuilder, MessageBuilder};
use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::{
    channel::Message,
    id::{marker::ChannelMarker, Id},
};

use crate::core::Context;

#[async_trait]
pub trait ChannelExt {
    /// Create a message with the builder's content, embed, and attachments
    async fn create_message(&self, ctx: &Context, builder: MessageBuilder<'_>) -> Result<()>;

    /// Create a message inside a red embed
    async fn error(&self, ctx: &Context, content: &str) -> Result<()>;

    /// Create a message without embed; only content
    async fn plain_message(&self, ctx: &Context, content: &str) -> Result<()>;
}

#[async_trait]
impl ChannelExt for Id<ChannelMarker> {
    async fn create_message(&self, ctx: &Context, builder: MessageBuilder<'_>) -> Result<()> {
        let mut req = ctx.http.create_message(*self);

        if let Some(ref content) = builder.content {
            req = req.content(content.as_ref())?;
        }

        if let Some(ref embed) = builder.embed {
            req = req.embeds(slice::from_ref(embed))?;
        }

        if !builder.attachments.is_empty() {
            req = req.attachments(&builder.attachments)?;
        }

        req.await.wrap_err("failed to create message")?;

        Ok(())
    }

    async fn error(&self, ctx: &Context, content: &str) -> Result<()> {
        let embed = EmbedBuilder::new().color_red().description(content).build();

        ctx.http
            .create_message(*self)
            .embeds(&[embed])?
            .await
            .wrap_err("failed to create error message")?;

        Ok(())
    }

    async fn plain_message(&self, ctx: &Context, content: &str) -> Result<()> {
        ctx.http
            .create_message(*self)
            .content(content)?
            .await
            .wrap_err("failed to create plain message")?;

        Ok(())
    }
}

#[async_trait]
impl ChannelExt for Message {
    async fn create_message(&self, ctx: &Context, builder: MessageBuilder<'_>) -> Result<()> {
        self.channel_id.create_message(ctx, builder).await
    }

    async fn error(&self, ctx: &Context, content: &str) -> Result<()> {
        self.channel_id.error(ctx, content).await
    }

    async fn plain_message(&self, ctx: &Context, content: &str) -> Result<()> {
        self.channel_id.plain_message(ctx, content).await
    }
}

#[async_trait]
pub trait MessageExt {
    /// React with a unicode emoji
    async fn react(&self, ctx: &Context, emoji: &str) -> Result<()>;
}

#[async_trait]
impl MessageExt for Message {
    async fn react(&self, ctx: &Context, emoji: &str) -> Result<()> {
        let emoji = RequestReactionType::Unicode { name: emoji };

        ctx.http
            .create_reaction(self.channel_id, self.id, &emoji)
            .await
            .wrap_err("failed to create reaction")?;

        Ok(())
    }
}
