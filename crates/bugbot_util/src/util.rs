use anyhow::{anyhow, Context, Result};
use std::env;
use std::future::Future;
use std::time::Duration;

/// If the result of the given code is an error, log it nicely. Otherwise just ignore the value.
#[macro_export]
macro_rules! log_error {
    ($e:expr) => {
        if let Err(e) = $e {
            let e = anyhow::anyhow!(e);
            tracing::error!(
                error.message = %&e,
                error.root_cause = %e.root_cause(),
                "{:?}",
                e
            );
        }
    };
    ($context:expr, $e:expr $(,)?) => {
        if let Err(e) = $e {
            let e = ::anyhow::anyhow!(e).context($context);
            tracing::error!(
                error.message = %&e,
                error.root_cause = %e.root_cause(),
                "{:?}",
                e
            );
        }
    };
}

/// Get an environment variable, returning an Err with a
/// nice error message mentioning the missing variable in case the value is not found.
pub fn required_env_var(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("Missing environment variable {}", key))
}

/// like [required_env_var], but also uses FromStr to parse the value.
pub fn parse_required_env_var<E: Into<anyhow::Error>, T: std::str::FromStr<Err = E>>(
    key: &str,
) -> Result<T> {
    required_env_var(key)?
        .parse()
        .map_err(|e: E| anyhow!(e))
        .with_context(|| format!("Failed to parse env-var {}", key))
}

pub fn ellipsis_text(text: &str, max_len: usize) -> String {
    if text.len() + 3 > max_len {
        let mut cutoff = max_len - 3;
        while !text.is_char_boundary(cutoff) {
            cutoff -= 1;
        }
        format!("{}...", text.split_at(cutoff).0)
    } else {
        text.to_string()
    }
}

/// Discord only allows lowercase alphanumerics and dashes in channel names.
pub fn channel_slug(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.len() > max_len {
        slug.truncate(max_len);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

const MAX_TICKET_CHANNEL_NAME_LEN: usize = 90;
const MAX_TICKET_SLUG_LEN: usize = 60;

/// Name for a ticket channel, built from the bug title and the report id.
pub fn ticket_channel_name(title: &str, report_id: &str) -> String {
    let slug = channel_slug(title, MAX_TICKET_SLUG_LEN);
    let slug = if slug.is_empty() { "bug".to_string() } else { slug };
    let mut name = format!("bug-{}-{}", slug, report_id.to_lowercase());
    name.truncate(MAX_TICKET_CHANNEL_NAME_LEN);
    while name.ends_with('-') {
        name.pop();
    }
    name
}

/// Run a fallible async operation up to `attempts` times, doubling the delay
/// between attempts. Errors for which `retryable` returns false are returned
/// immediately.
pub async fn with_backoff<T, E, Fut>(
    attempts: u32,
    base_delay: Duration,
    retryable: impl Fn(&E) -> bool,
    mut operation: impl FnMut() -> Fut,
) -> Result<T, E>
where
    E: std::fmt::Display,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    let mut delay = base_delay;
    loop {
        match operation().await {
            Err(err) if attempt < attempts && retryable(&err) => {
                tracing::warn!(error.message = %err, attempt, "Operation failed, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn channel_slug_sanitizes_to_lowercase_alphanumerics_and_dashes() {
        assert_eq!(channel_slug("Login crashes!! (on iOS)", 60), "login-crashes-on-ios");
        assert_eq!(channel_slug("--weird---input--", 60), "weird-input");
        assert_eq!(channel_slug("🐛🐛🐛", 60), "");
    }

    #[test]
    fn channel_slug_truncation_never_leaves_a_trailing_dash() {
        assert_eq!(channel_slug("abcd efgh", 5), "abcd");
        assert_eq!(channel_slug("abcde", 5), "abcde");
    }

    #[test]
    fn ticket_channel_name_is_valid_and_bounded() {
        let name = ticket_channel_name(&"Very long bug title ".repeat(20), "BR-1234");
        assert!(name.len() <= 90);
        assert!(name.starts_with("bug-very-long-bug-title"));
        assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!name.contains("--"));
        assert!(!name.ends_with('-'));
    }

    #[test]
    fn ticket_channel_name_falls_back_for_unusable_titles() {
        assert_eq!(ticket_channel_name("!!!", "BR-1234"), "bug-bug-br-1234");
    }

    #[tokio::test]
    async fn with_backoff_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(
            3,
            Duration::from_millis(1),
            |_: &&str| true,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err("transient")
                    } else {
                        Ok(n)
                    }
                }
            },
        )
        .await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_backoff_gives_up_after_attempt_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_backoff(
            2,
            Duration::from_millis(1),
            |_: &&str| true,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("transient") }
            },
        )
        .await;
        assert_eq!(result, Err("transient"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn with_backoff_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_backoff(
            3,
            Duration::from_millis(1),
            |err: &&str| *err != "permanent",
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("permanent") }
            },
        )
        .await;
        assert_eq!(result, Err("permanent"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
