use std::env;

use poise::serenity_prelude::{ChannelId, GuildId, RoleId};

use crate::util::{parse_required_env_var, required_env_var};

const REQUIRED_VARS: &[&str] = &[
    "TOKEN",
    "GUILD",
    "CHANNEL_BUG_LOG",
    "CATEGORY_TICKETS",
    "ROLE_STAFF",
    "GITHUB_TOKEN",
    "GITHUB_OWNER",
    "GITHUB_REPO",
];

const DEFAULT_ISSUE_LABEL: &str = "bug";

#[derive(Debug)]
pub struct Config {
    pub discord_token: String,

    pub guild: GuildId,
    pub role_staff: RoleId,
    pub channel_bug_log: ChannelId,
    pub category_tickets: ChannelId,

    pub github_token: String,
    pub github_owner: String,
    pub github_repo: String,
    pub github_label: String,

    pub time_started: chrono::DateTime<chrono::Utc>,
}

impl Config {
    pub fn from_environment() -> anyhow::Result<Self> {
        let missing: Vec<&str> =
            REQUIRED_VARS.iter().filter(|key| env::var(key).is_err()).copied().collect();
        if !missing.is_empty() {
            anyhow::bail!("Missing environment variables: {}", missing.join(", "));
        }

        Ok(Config {
            discord_token: required_env_var("TOKEN")?,
            guild: GuildId::new(parse_required_env_var("GUILD")?),
            role_staff: RoleId::new(parse_required_env_var("ROLE_STAFF")?),
            channel_bug_log: ChannelId::new(parse_required_env_var("CHANNEL_BUG_LOG")?),
            category_tickets: ChannelId::new(parse_required_env_var("CATEGORY_TICKETS")?),
            github_token: required_env_var("GITHUB_TOKEN")?,
            github_owner: required_env_var("GITHUB_OWNER")?,
            github_repo: required_env_var("GITHUB_REPO")?,
            github_label: env::var("GITHUB_LABEL")
                .unwrap_or_else(|_| DEFAULT_ISSUE_LABEL.to_string()),
            time_started: chrono::Utc::now(),
        })
    }
}
