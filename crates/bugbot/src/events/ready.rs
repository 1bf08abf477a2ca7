use anyhow::Result;
use bugbot_util::{extensions::ChannelIdExt, log_error, UserData};
use serenity::{client, model::gateway::Ready};

pub async fn ready(ctx: &client::Context, data: &UserData, data_about_bot: &Ready) -> Result<()> {
    tracing::info!(user = %data_about_bot.user.tag(), "Bug reporting bot is ready");

    let started = data.config.time_started.timestamp();
    log_error!(
        "Failed to announce startup in the bug log channel",
        data.config
            .channel_bug_log
            .send_embed_builder(ctx, |e| {
                e.title("Bug reporting is back online").description(startup_message(started))
            })
            .await
    );

    Ok(())
}

/// Discord renders `<t:...:R>` as a relative timestamp ("2 minutes ago").
fn startup_message(started_unix: i64) -> String {
    format!("Started <t:{started_unix}:R>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_message_uses_a_relative_discord_timestamp() {
        assert_eq!(startup_message(1700000000), "Started <t:1700000000:R>");
    }
}
