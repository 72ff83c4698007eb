use std::borrow::Cow;

use twilight_model::{channel::message::embed::Embed, http::attachment::Attachment};

use super::EmbedBuilder;

#[derive(Default)]
pub struct MessageBuilder<'c> {
    pub content: Option<Cow<'c, str>>,
    pub embed: Option<Embed>,
    pub attachments: Vec<Attachment>,
}

impl<'c> MessageBuilder<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<Cow<'c, str>>) -> Self {
        self.content = Some(content.into());

        self
    }

    pub fn embed(mut self, embed: impl IntoEmbed) -> Self {
        self.embed = Some(embed.into_embed());

        self
    }

    /// Append an attachment; ids are assigned in insertion order.
    pub fn attachment(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let id = self.attachments.len() as u64;
        self.attachments
            .push(Attachment::from_bytes(name.into(), bytes, id));

        self
    }

    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        for (attachment, id) in attachments.into_iter().zip(self.attachments.len() as u64..) {
            self.attachments.push(Attachment { id, ..attachment });
        }

        self
    }
}

pub trait IntoEmbed {
    fn into_embed(self) -> Embed;
}

impl IntoEmbed for Embed {
    #[inline]
    fn into_embed(self) -> Embed {
        self
    }
}

impl IntoEmbed for EmbedBuilder {
    #[inline]
    fn into_embed(self) -> Embed {
        self.build()
    }
}

impl IntoEmbed for String {
    #[inline]
    fn into_embed(self) -> Embed {
        EmbedBuilder::new().description(self).build()
    }
}

impl IntoEmbed for &str {
    #[inline]
    fn into_embed(self) -> Embed {
        EmbedBuilder::new().description(self).build()
    }
}

#[cfg(test)]
mod tests {
    use twilight_model::http::attachment::Attachment;

    use super::MessageBuilder;

    #[test]
    fn attachment_ids_are_unique() {
        let builder = MessageBuilder::new()
            .attachment("a.png", vec![1])
            .attachments(vec![
                Attachment::from_bytes("b.png".to_owned(), vec![2], 0),
                Attachment::from_bytes("c.png".to_owned(), vec![3], 0),
            ]);

        let ids: Vec<_> = builder.attachments.iter().map(|a| a.id).collect();

        assert_eq!(ids, [0, 1, 2]);
    }
}
