use crate::{config::Config, embeds, prelude::Ctx};

use anyhow::{Context, Result};
use poise::{CreateReply, ReplyHandle};
use serenity::{
    async_trait,
    builder::{CreateEmbed, CreateMessage},
    client,
    model::{channel::Message, id::ChannelId},
};
use std::{fmt::Display, sync::Arc};

type StdResult<T, E> = std::result::Result<T, E>;

#[extend::ext(name = PoiseContextExt)]
#[async_trait]
pub impl<'a> Ctx<'a> {
    fn get_config(&self) -> Arc<Config> {
        self.data().config.clone()
    }

    /// Send an embed, making it ephemeral optionally.
    /// Will make message a reply unconditionally.
    async fn reply_embed_full(
        &self,
        ephemeral: bool,
        embed: CreateEmbed,
    ) -> StdResult<ReplyHandle<'_>, serenity::Error> {
        let reply = CreateReply::default().ephemeral(ephemeral).embed(embed).reply(true);
        self.send(reply).await
    }

    async fn say_success(
        &self,
        text: impl Display + Send + Sync + 'static,
    ) -> StdResult<ReplyHandle<'_>, serenity::Error> {
        tracing::info!(
            msg.ephemeral = true,
            msg.content = %text,
            msg.responding_to_user = %self.author().tag(),
            "Sending success message to user"
        );
        self.reply_embed_full(true, embeds::make_success_embed(&text.to_string())).await
    }

    async fn say_error(
        &self,
        text: impl Display + Send + Sync + 'static,
    ) -> StdResult<ReplyHandle<'_>, serenity::Error> {
        tracing::info!(
            msg.ephemeral = true,
            msg.content = %text,
            msg.responding_to_user = %self.author().tag(),
            "Sending error message to user"
        );
        self.reply_embed_full(true, embeds::make_error_embed(&text.to_string())).await
    }
}

#[extend::ext(name = ChannelIdExt)]
#[async_trait]
pub impl ChannelId {
    async fn send_embed(&self, ctx: &client::Context, embed: CreateEmbed) -> Result<Message> {
        let msg = CreateMessage::default().embed(embed);
        Ok(self.send_message(&ctx, msg).await.context("Failed to send embed message")?)
    }

    async fn send_embed_builder(
        &self,
        ctx: &client::Context,
        build: impl FnOnce(CreateEmbed) -> CreateEmbed + Send + Sync,
    ) -> Result<Message> {
        self.send_embed(ctx, build(embeds::base_embed())).await
    }
}

#[extend::ext(name = CreateEmbedExt)]
pub impl CreateEmbed {
    fn field_opt(
        self,
        name: impl Into<String>,
        value: Option<impl Into<String>>,
        inline: bool,
    ) -> Self {
        match value {
            Some(value) => self.field(name, value, inline),
            None => self,
        }
    }
}
