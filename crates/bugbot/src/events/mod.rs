use bugbot_util::{prelude::Error, UserData};
use serenity::{all::FullEvent, client};

pub mod interaction_create;
pub mod ready;

pub async fn handle_event(
    ctx: &client::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, UserData, Error>,
    data: &UserData,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => ready::ready(ctx, data, data_about_bot).await,
        FullEvent::InteractionCreate { interaction } => {
            interaction_create::interaction_create(ctx, data, interaction).await
        }
        _ => Ok(()),
    }
}
