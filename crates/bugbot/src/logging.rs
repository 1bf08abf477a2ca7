use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes logging. Respects the `RUST_LOG` environment variable for log
/// filters; the default filter silences serenity's ratelimit chatter.
pub fn init_tracing() {
    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(
            "info,bugbot=debug,serenity::http::ratelimiting=off,serenity::http::request=off",
        )
        .unwrap()
    });

    tracing_subscriber::registry().with(log_filter).with(tracing_subscriber::fmt::layer()).init();
}
