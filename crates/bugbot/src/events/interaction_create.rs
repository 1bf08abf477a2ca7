use std::time::Duration;

use anyhow::{Context, Result};
use bugbot_github::NewIssue;
use bugbot_util::{
    custom_ids, embeds,
    extensions::ChannelIdExt,
    log_error,
    pending::Claim,
    report::{self, Report},
    util, UserData,
};
use poise::serenity_prelude::Mentionable;
use serenity::{
    all::{
        ActionRow, ActionRowComponent, ButtonStyle, ChannelType, ComponentInteraction,
        InputTextStyle, Interaction, ModalInteraction, PermissionOverwrite,
        PermissionOverwriteType, Permissions, RoleId,
    },
    builder::{
        CreateActionRow, CreateButton, CreateChannel, CreateInputText, CreateInteractionResponse,
        CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateMessage,
        CreateModal, EditInteractionResponse,
    },
    client,
};

const TICKET_CLOSE_DELAY: Duration = Duration::from_secs(5);

const CHANNEL_CREATE_ATTEMPTS: u32 = 3;
const CHANNEL_CREATE_BASE_DELAY: Duration = Duration::from_millis(500);

const GENERIC_ERROR_TEXT: &str = "Something went wrong. Please try again later.";

/// Route an interaction to its handler branch. Failures are logged by the
/// framework error handler; here we just make sure the user still gets a
/// generic answer when possible.
pub async fn interaction_create(
    ctx: &client::Context,
    data: &UserData,
    interaction: &Interaction,
) -> Result<()> {
    match interaction {
        Interaction::Component(component) => {
            if let Err(err) = handle_component(ctx, data, component).await {
                let response = CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(GENERIC_ERROR_TEXT)
                        .ephemeral(true),
                );
                // Once a branch has acknowledged the interaction, the initial
                // response slot is taken and only a followup still reaches
                // the user.
                if component.create_response(&ctx, response).await.is_err() {
                    let followup = CreateInteractionResponseFollowup::new()
                        .content(GENERIC_ERROR_TEXT)
                        .ephemeral(true);
                    let _ = component.create_followup(&ctx, followup).await;
                }
                return Err(err);
            }
        }
        Interaction::Modal(modal) if modal.data.custom_id == custom_ids::REPORT_MODAL => {
            if let Err(err) = handle_report_submission(ctx, data, modal).await {
                let followup = CreateInteractionResponseFollowup::new()
                    .content(GENERIC_ERROR_TEXT)
                    .ephemeral(true);
                let _ = modal.create_followup(&ctx, followup).await;
                return Err(err);
            }
        }
        _ => {}
    }
    Ok(())
}

async fn handle_component(
    ctx: &client::Context,
    data: &UserData,
    component: &ComponentInteraction,
) -> Result<()> {
    let custom_id = component.data.custom_id.as_str();
    if custom_id == custom_ids::OPEN_MODAL_BUTTON {
        open_report_modal(ctx, component).await
    } else if let Some(report_id) = custom_ids::parse_open_chat_button_id(custom_id) {
        open_ticket_channel(ctx, data, component, report_id).await
    } else if custom_id == custom_ids::CLOSE_TICKET_BUTTON {
        close_ticket(ctx, data, component).await
    } else {
        Ok(())
    }
}

/// Show the report form. Discord caps modals at five inputs, which is exactly
/// what we need.
#[tracing::instrument(skip_all, fields(user.tag = %component.user.tag()))]
async fn open_report_modal(ctx: &client::Context, component: &ComponentInteraction) -> Result<()> {
    let inputs = vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Short title", "title").required(true),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "What happened?", "description")
                .required(true),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Steps to reproduce (optional)", "steps")
                .required(false),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Expected result (optional)", "expected")
                .required(false),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Actual result (optional)", "actual")
                .required(false),
        ),
    ];
    let modal = CreateModal::new(custom_ids::REPORT_MODAL, "Report a Bug").components(inputs);
    component.create_response(&ctx, CreateInteractionResponse::Modal(modal)).await?;
    Ok(())
}

/// Create the GitHub issue, mirror the report into the staff log and offer
/// the reporter a follow-up chat.
#[tracing::instrument(skip_all, fields(user.tag = %modal.user.tag(), report.id))]
async fn handle_report_submission(
    ctx: &client::Context,
    data: &UserData,
    modal: &ModalInteraction,
) -> Result<()> {
    let rows = &modal.data.components;
    let mut report = Report {
        id: report::new_report_id(),
        user: modal.user.id,
        user_tag: modal.user.tag(),
        title: modal_field(rows, "title").unwrap_or_default().to_string(),
        description: modal_field(rows, "description").unwrap_or_default().to_string(),
        steps: modal_field(rows, "steps").unwrap_or_default().to_string(),
        expected: modal_field(rows, "expected").unwrap_or_default().to_string(),
        actual: modal_field(rows, "actual").unwrap_or_default().to_string(),
        issue_url: String::new(),
    };
    tracing::Span::current().record("report.id", report.id.as_str());

    // The GitHub round-trip can exceed the 3 second response window.
    let defer =
        CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true));
    modal.create_response(&ctx, defer).await?;

    let issue = data
        .github
        .create_issue(&NewIssue {
            title: report.issue_title(),
            body: report.issue_body(),
            labels: vec![data.config.github_label.clone()],
        })
        .await
        .context("Failed to create GitHub issue")?;
    report.issue_url = issue.html_url;

    tracing::info!(
        report.id = %report.id,
        issue.number = issue.number,
        issue.url = %report.issue_url,
        "Created GitHub issue for bug report"
    );

    // The staff log is best-effort, a broken log channel must not fail the report.
    log_error!(
        "Failed to post bug report to the staff log channel",
        data.config.channel_bug_log.send_embed(ctx, embeds::bug_report_embed(&report)).await
    );

    let content = format!(
        "✅ **Bug report submitted!**\n\
         Your report has been logged and a GitHub issue has been created: {}\n\n\
         If you have screenshots or want to speak directly with a developer to \
         better explain the issue, click below:",
        report.issue_url
    );
    let chat_row = CreateActionRow::Buttons(vec![CreateButton::new(
        custom_ids::open_chat_button_id(&report.id),
    )
    .label("💬 Speak with the developers")
    .style(ButtonStyle::Primary)]);

    data.pending.insert(report);

    modal
        .edit_response(
            &ctx,
            EditInteractionResponse::new().content(content).components(vec![chat_row]),
        )
        .await?;
    Ok(())
}

/// Open a private ticket channel for the submitter of a pending report.
#[tracing::instrument(skip_all, fields(user.tag = %component.user.tag(), report.id = report_id))]
async fn open_ticket_channel(
    ctx: &client::Context,
    data: &UserData,
    component: &ComponentInteraction,
    report_id: &str,
) -> Result<()> {
    let report = match data.pending.claim(report_id, component.user.id) {
        Claim::Claimed(report) => report,
        Claim::Expired => {
            return respond_ephemeral(
                ctx,
                component,
                "That session expired. If you still need a chat, please contact staff directly.",
            )
            .await;
        }
        Claim::NotYours => {
            return respond_ephemeral(
                ctx,
                component,
                "Only the person who submitted this report can open a chat.",
            )
            .await;
        }
    };
    let guild_id = component.guild_id.context("Chat button clicked outside of a guild")?;

    component.create_response(&ctx, CreateInteractionResponse::Acknowledge).await?;

    let config = &data.config;
    let channel_name = util::ticket_channel_name(&report.title, &report.id);
    let topic = format!("Report ID: {} | User: {}", report.id, report.user);
    let bot_id = ctx.cache.current_user().id;
    let overwrites = vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(RoleId::new(guild_id.get())),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::READ_MESSAGE_HISTORY
                | Permissions::EMBED_LINKS
                | Permissions::ATTACH_FILES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(bot_id),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::READ_MESSAGE_HISTORY,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(report.user),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::READ_MESSAGE_HISTORY
                | Permissions::MANAGE_CHANNELS,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(config.role_staff),
        },
    ];

    let ticket = util::with_backoff(
        CHANNEL_CREATE_ATTEMPTS,
        CHANNEL_CREATE_BASE_DELAY,
        |_: &serenity::Error| true,
        || {
            let builder = CreateChannel::new(channel_name.clone())
                .kind(ChannelType::Text)
                .category(config.category_tickets)
                .topic(topic.clone())
                .permissions(overwrites.clone());
            guild_id.create_channel(ctx, builder)
        },
    )
    .await;
    let ticket = match ticket {
        Ok(ticket) => ticket,
        Err(err) => {
            // Keep the report claimable so the user can simply click again.
            data.pending.insert(report);
            return Err(err).context("Failed to create ticket channel");
        }
    };

    let close_row = CreateActionRow::Buttons(vec![CreateButton::new(
        custom_ids::CLOSE_TICKET_BUTTON,
    )
    .label("Close Ticket")
    .style(ButtonStyle::Danger)
    .emoji('🔒')]);
    let greeting = format!(
        "Thanks! We've saved your report and created a GitHub issue: {}\n\
         You can drop screenshots or extra details here.",
        report.issue_url
    );
    ticket
        .send_message(
            &ctx,
            CreateMessage::new()
                .content(greeting)
                .embed(embeds::bug_report_embed(&report))
                .components(vec![close_row]),
        )
        .await
        .context("Failed to send the greeting into the ticket channel")?;

    tracing::info!(
        report.id = %report.id,
        ticket.channel_id = %ticket.id,
        ticket.channel_name = %channel_name,
        "Opened ticket channel for bug report"
    );

    component
        .edit_response(
            &ctx,
            EditInteractionResponse::new()
                .content(format!(
                    "✅ **A private chat has been opened for you here:** {}",
                    ticket.mention()
                ))
                .components(vec![]),
        )
        .await?;
    Ok(())
}

/// Staff-only: announce and delete the ticket channel after a short delay.
#[tracing::instrument(skip_all, fields(user.tag = %component.user.tag(), channel_id = %component.channel_id))]
async fn close_ticket(
    ctx: &client::Context,
    data: &UserData,
    component: &ComponentInteraction,
) -> Result<()> {
    let is_staff = component
        .member
        .as_ref()
        .is_some_and(|member| member.roles.contains(&data.config.role_staff));
    if !is_staff {
        return respond_ephemeral(ctx, component, "❌ Only staff can close this ticket.").await;
    }

    component
        .create_response(
            &ctx,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content("Closing this ticket in 5 seconds..."),
            ),
        )
        .await?;

    let ctx = ctx.clone();
    let channel_id = component.channel_id;
    tokio::spawn(async move {
        tokio::time::sleep(TICKET_CLOSE_DELAY).await;
        // The channel may already be gone, nothing to do about that.
        log_error!("Failed to delete ticket channel", channel_id.delete(&ctx).await);
    });
    Ok(())
}

async fn respond_ephemeral(
    ctx: &client::Context,
    component: &ComponentInteraction,
    text: &str,
) -> Result<()> {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new().content(text).ephemeral(true),
    );
    component.create_response(&ctx, response).await?;
    Ok(())
}

fn modal_field<'a>(rows: &'a [ActionRow], custom_id: &str) -> Option<&'a str> {
    rows.iter().flat_map(|row| row.components.iter()).find_map(|component| match component {
        ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
            input.value.as_deref()
        }
        _ => None,
    })
}
