use hero_guide_bot::{BotConfig, BotError, ConsoleTransport, Dispatcher, console};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> hero_guide_core::Result<(), BotError> {
    // Standard output carries the console transport, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BotConfig::from_env().map_err(|e| BotError::Config {
        reason: e.to_string(),
    })?;
    tracing::info!(
        data_file = %config.storage.data_file.display(),
        logs_dir = %config.audit.logs_dir.display(),
        "Loaded configuration"
    );

    let transport = Arc::new(ConsoleTransport::stdout());
    let dispatcher = Arc::new(Dispatcher::from_config(&config, transport));

    tokio::select! {
        result = console::run(dispatcher, BufReader::new(tokio::io::stdin())) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }
    Ok(())
}
