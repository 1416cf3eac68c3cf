use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use usta::app::ScrapeContext;
use usta::cli::{commands, Cli, Commands, ConfigAction};
use usta::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;

    match cli.command {
        Commands::Scrape(args) => {
            let mut config = Config::load(cli.config.as_deref())?;
            args.apply(&mut config);

            let ctx = ScrapeContext::new(config)?;
            stop_on_signal(ctx.cancel_token());
            commands::scrape(&ctx).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::show_config_path(cli.config.as_deref())?,
            ConfigAction::Init { force } => commands::init_config(cli.config.as_deref(), force)?,
        },
    }

    Ok(())
}

/// Log to stdout, and to `log_file` as well when given. `RUST_LOG` overrides
/// the default `info` level.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}

/// Cancel the crawl on SIGINT/SIGTERM so partial results still get written.
fn stop_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    _ => {
                        warn!("Failed to install signal handlers");
                        return;
                    }
                };

            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
        }

        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("Failed to install ctrl-c handler");
                return;
            }
        }

        warn!("Stop requested, finishing with the records collected so far");
        token.cancel();
    });
}
