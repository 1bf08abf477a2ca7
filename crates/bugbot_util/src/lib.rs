pub mod config;
pub mod custom_ids;
pub mod embeds;
pub mod extensions;
pub mod pending;
pub mod prelude;
pub mod report;
pub mod util;

use std::sync::Arc;

use bugbot_github::GithubClient;

/// Shared state handed to every command and event handler.
/// Constructed once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct UserData {
    pub config: Arc<config::Config>,
    pub github: Arc<GithubClient>,
    pub pending: Arc<pending::PendingReports>,
}
