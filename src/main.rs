//! Scavenge bot binary entrypoint wiring the Telegram transport, SQLite store, and photo gallery.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use reqwest::Client;
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scavenge_bot::{
    config::{Settings, load_game},
    dao::hunt_store::sqlite::SqliteHuntStore,
    services::{orchestrator::Orchestrator, photo_service::PhotoArchiver},
    transport::{
        UpdateSource,
        telegram::{TelegramClient, TelegramConfig},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_tracing(settings.verbose);

    let game = load_game(&settings.game_file).context("loading game file")?;
    let admins = settings.admin_list();

    info!(
        game_file = %settings.game_file.display(),
        gallery = %settings.gallery.display(),
        database = %settings.database.display(),
        admins = %settings.admins.join(","),
        verbose = settings.verbose,
        "starting scavenge bot"
    );

    let store = SqliteHuntStore::open(&settings.database).context("opening database")?;
    let telegram = TelegramClient::new(&TelegramConfig::new(settings.telegram_token.clone()))
        .context("building Telegram client")?;
    let downloads = Client::builder()
        .build()
        .context("building download client")?;
    let archiver = PhotoArchiver::new(
        Handle::current(),
        Arc::new(telegram.clone()),
        downloads,
        settings.gallery.clone(),
    );

    let mut orchestrator = Orchestrator::new(
        Box::new(store),
        admins,
        game,
        Arc::new(archiver),
        Arc::new(telegram.clone()),
    );

    tokio::select! {
        _ = orchestrator.run(telegram.updates()) => {},
        _ = shutdown_signal() => info!("shutdown requested"),
    }

    Ok(())
}

/// Configure tracing so `RUST_LOG` wins over the `--verbose` default.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
