use std::sync::Arc;

use bugbot_commands::commands;
use bugbot_github::GithubClient;
use bugbot_util::{config::Config, pending::PendingReports, prelude::Ctx, UserData};
use poise::serenity_prelude::GatewayIntents;
use serenity::all::OnlineStatus;

mod error_handling;
pub mod events;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::from_environment()?;
    let github = GithubClient::new(
        config.github_token.clone(),
        config.github_owner.clone(),
        config.github_repo.clone(),
    );

    let framework_options = poise::FrameworkOptions {
        commands: commands::all_commands(),
        on_error: |err| Box::pin(error_handling::on_error(err)),
        pre_command: |ctx| Box::pin(pre_command(ctx)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(events::handle_event(ctx, event, framework, data))
        },
        ..Default::default()
    };

    let config = Arc::new(config);
    let user_data = UserData {
        config: config.clone(),
        github: Arc::new(github),
        pending: Arc::new(PendingReports::default()),
    };

    let command_guild = config.guild;
    let framework = poise::Framework::builder()
        .options(framework_options)
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_in_guild(
                    ctx,
                    &framework.options().commands,
                    command_guild,
                )
                .await?;
                Ok(user_data)
            })
        })
        .build();

    let mut client = serenity::Client::builder(&config.discord_token, GatewayIntents::GUILDS)
        .activity(serenity::gateway::ActivityData::watching("for bug reports"))
        .status(OnlineStatus::Online)
        .framework(framework)
        .await?;

    client.start().await?;

    Ok(())
}

async fn pre_command(ctx: Ctx<'_>) {
    tracing::info!(
        command_name = ctx.command().qualified_name.as_str(),
        invocation = ctx.invocation_string(),
        msg.author = %ctx.author().tag(),
        msg.author_id = %ctx.author().id,
        msg.channel_id = %ctx.channel_id(),
        "{} invoked by {}",
        ctx.command().name,
        ctx.author().tag()
    );
}
