//! Backend entry-point: loads settings, prepares storage and runs the server.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bootcamp_directory::inbound::http::health::HealthState;
use bootcamp_directory::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use bootcamp_directory::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Why the server is being stopped.
#[derive(Debug, Clone, Copy)]
enum Shutdown {
    Signal,
    Panic,
}

/// Chain a hook onto the default panic handler that requests a shutdown.
fn install_panic_hook(shutdown: mpsc::UnboundedSender<Shutdown>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        previous(panic);
        // The receiver is gone once shutdown has started.
        let _ = shutdown.send(Shutdown::Panic);
    }));
}

async fn connect(settings: &AppSettings, url: &str) -> io::Result<DbPool> {
    run_pending_migrations(url).await.map_err(io::Error::other)?;
    let config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
    DbPool::new(config).await.map_err(io::Error::other)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os()).map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(settings.clone(), bind_addr);
    if let Some(url) = settings.database_url.as_deref() {
        config = config.with_db_pool(connect(&settings, url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    info!(%bind_addr, "listening");

    let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel();
    install_panic_hook(shutdown_tx.clone());
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(Shutdown::Signal);
            }
            Err(e) => error!(error = %e, "cannot listen for shutdown signal"),
        }
    });
    tokio::spawn(async move {
        if let Some(reason) = shutdown_rx.recv().await {
            warn!(?reason, "shutting down");
            health_state.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await
}
