//! lodestone - console runner.
//!
//! Reads `sender: message` lines from stdin, feeds them to a [`Bot`] as chat
//! events and prints outbound chat to stdout.

use lodestone::config::{self, Config, LogFormat};
use lodestone::host::{ConsoleHost, parse_console_line};
use lodestone::telemetry::spans;
use lodestone::{Bot, metrics};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Instrument, error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match config.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration; a missing default file means built-in defaults
    let explicit_path = std::env::args().nth(1);
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| "config.toml".to_string());
    let config = if explicit_path.is_none() && !Path::new(&config_path).exists() {
        Config::default()
    } else {
        Config::load(&config_path)?
    };

    init_tracing(&config);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    metrics::init();

    let host = Arc::new(ConsoleHost::new(config.bot.username.as_str()));
    let bot = Bot::from_config(host, &config).await?;

    let session = spans::session(bot.server(), bot.username());
    run(Arc::clone(&bot)).instrument(session).await?;

    for (command, count) in bot.command_stats() {
        info!(command = %command, count, "Command usage");
    }
    info!(metrics = %metrics::gather_metrics(), "Final metrics");
    Ok(())
}

/// Feed stdin to the bot until EOF or Ctrl-C.
async fn run(bot: Arc<Bot>) -> anyhow::Result<()> {
    info!(
        server = %bot.server(),
        username = %bot.username(),
        prefix = %bot.prefix(),
        "lodestone ready; type `sender: message` lines"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        };
        let Some(line) = line else {
            info!("End of input, shutting down");
            break;
        };
        let Some(event) = parse_console_line(&line) else {
            continue;
        };

        // Handler errors are not isolated by the registry; the runner
        // reports them and keeps going.
        if let Err(e) = bot.handle_chat(event).await {
            warn!(error = %e, code = e.error_code(), "Command handler failed");
        }
    }
    Ok(())
}
