use poise::CreateReply;

use bugbot_util::{extensions::PoiseContextExt, log_error, prelude, UserData};

/// Handler passed to poise
pub async fn on_error(error: poise::FrameworkError<'_, UserData, prelude::Error>) {
    use poise::FrameworkError::*;
    if let Some(ctx) = error.ctx() {
        tracing::error!(
            error.message = %error,
            error = ?error,
            command_name = %ctx.command().qualified_name,
            invocation = %ctx.invocation_string(),
            author.tag = %ctx.author().tag(),
            "Error occured in context, more details will follow"
        );
    }
    match error {
        Command { error, ctx, .. } => {
            handle_command_error(ctx, error).await;
        }
        CommandPanic { payload, ctx, .. } => {
            tracing::error!(
                error.message = %payload.unwrap_or_default(),
                command_name = ctx.command().qualified_name,
                invocation = %ctx.invocation_string(),
                "Command panicked"
            );
        }
        Setup { error, .. } => {
            tracing::error!(error.message = %error, "Error during setup: {}", error)
        }
        EventHandler { error, event, .. } => {
            tracing::error!(event = ?event, error.message = %error, "Error in event listener: {}", error);
        }
        MissingBotPermissions { missing_permissions, ctx, .. } => {
            log_error!(
                ctx.say_error(format!(
                    "It seems like I am lacking the {missing_permissions} permission",
                ))
                .await
            );
            tracing::error!(
                error.message = "Bot missing permissions",
                error.missing_permissions = %missing_permissions,
                command_name = ctx.command().qualified_name,
                invocation = %ctx.invocation_string(),
                author = ctx.author().tag(),
                "Bot missing permissions: {missing_permissions}",
            )
        }
        MissingUserPermissions { missing_permissions, ctx, .. } => {
            log_error!(ctx.say_error("You need **Manage Server** to do this.").await);
            tracing::info!(
                error.message = "User missing permissions",
                error.missing_permissions = ?missing_permissions,
                author = ctx.author().tag(),
                invocation = %ctx.invocation_string(),
                "User missing permissions: {missing_permissions:?}",
            )
        }
        NotAnOwner { ctx, .. } => {
            log_error!(ctx.say_error("You need to be an owner to do this").await);
        }
        GuildOnly { ctx, .. } => {
            log_error!(ctx.say_error("This can only be ran in a server").await);
        }
        CommandCheckFailed { error, ctx, .. } => {
            if let Some(error) = error {
                log_error!(
                    ctx.say_error("Something went wrong while checking your permissions").await
                );
                tracing::error!(
                    error.message = %error,
                    command_name = %ctx.command().qualified_name.as_str(),
                    invocation = %ctx.invocation_string(),
                    "Error while running command check: {error}"
                );
            } else if matches!(ctx, poise::Context::Application(_)) {
                log_error!(
                    ctx.send(
                        CreateReply::default().ephemeral(true).content("Insufficient permissions")
                    )
                    .await
                );
            }
        }
        other => {
            if let Some(ctx) = other.ctx() {
                tracing::error!(
                    error.message = %other,
                    error = ?other,
                    command.author.tag = ctx.author().tag(),
                    command_name = ctx.command().qualified_name,
                    invocation = %ctx.invocation_string(),
                    "unhandled error received from poise"
                );
            } else {
                tracing::error!(error.message = %other, error = ?other, "unhandled error received from poise");
            }
        }
    }
}

async fn handle_command_error(ctx: prelude::Ctx<'_>, err: prelude::Error) {
    if let Some(inner_err) = err.downcast_ref::<serenity::Error>() {
        tracing::warn!(
            command_name = %ctx.command().qualified_name.as_str(),
            invocation = %ctx.invocation_string(),
            error.message = %err,
            error.root_cause = %err.root_cause(),
            error.inner = ?inner_err,
            "Serenity error [handling {}]: {err}",
            ctx.command().qualified_name,
        );
        match inner_err {
            serenity::Error::Model(err) => {
                let _ = ctx.say_error(err.to_string()).await;
            }
            _ => {
                let _ = ctx.say_error("Something went wrong").await;
            }
        }
    } else {
        let _ = ctx.say_error("Something went wrong").await;
        tracing::warn!(
            command_name = %ctx.command().qualified_name.as_str(),
            invocation = %ctx.invocation_string(),
            error.message = %err,
            error.root_cause = %err.root_cause(),
            error = format!("{err:#?}"),
            "Internal error [handling {}]: {err}",
            ctx.command().qualified_name,
        );
    }
}
