use bugbot_util::{custom_ids, extensions::PoiseContextExt, prelude::*};
use indoc::indoc;
use poise::serenity_prelude::{ButtonStyle, CreateActionRow, CreateButton, CreateMessage};
use serenity::{client, model::id::ChannelId};

const PANEL_TEXT: &str = indoc!(
    "## 🛡️ Bug Reporting Center
    Help us improve by reporting issues you encounter. Your reports are handled privately by our staff.

    **How it works:**
    1. Click **Report a Bug** below.
    2. Fill out the form with as much detail as possible.
    3. After submitting, you can optionally chat with the devs to provide more info."
);

/// Post the bug report panel into the current channel
#[poise::command(
    slash_command,
    guild_only,
    rename = "setup-bugpanel",
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn setup_bugpanel(ctx: Ctx<'_>) -> Res<()> {
    post_bug_panel(ctx.serenity_context(), ctx.channel_id()).await?;
    ctx.say_success("✅ Bug panel posted.").await?;
    Ok(())
}

async fn post_bug_panel(ctx: &client::Context, channel_id: ChannelId) -> Res<()> {
    let button = CreateButton::new(custom_ids::OPEN_MODAL_BUTTON)
        .label("Report a Bug")
        .style(ButtonStyle::Danger)
        .emoji('🐛');
    let message =
        CreateMessage::new().content(PANEL_TEXT).components(vec![CreateActionRow::Buttons(vec![button])]);
    channel_id.send_message(ctx, message).await?;
    Ok(())
}
