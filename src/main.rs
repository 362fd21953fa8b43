//! Event Form - Telegram Mini-App form service

use event_form::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // INFO for this crate by default, override with RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("event_form=info,tower_http=info")),
        )
        .init();

    cli::run().await
}
