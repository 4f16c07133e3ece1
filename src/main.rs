//! Wires together the GUI catalog, SSE fan-out, status machine, bus client,
//! and HTTP server, then serves until SIGINT.

mod pages;

use clap::Parser;
use gui::GUICoordinator;
use service::config::{Cli, Config};
use service::logging::Logger;
use service::AppState;
use sse::{Manager as SseManager, SessionRegistry};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    Logger::init_logger(&config);

    log::info!("starting with {config}");

    let coordinator = Arc::new(Mutex::new(GUICoordinator::new()));
    let sse_manager = SseManager::new();
    let sessions = SessionRegistry::new();
    let registry = Arc::new(pages::build_registry());

    let (renderer, mut frames) = gui::renderer::spawn();
    let cancel = CancellationToken::new();

    // Forward every renderer frame onto the SSE broadcast.
    {
        let sse_manager = sse_manager.clone();
        tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                sse_manager.publish(frame.into());
            }
        });
    }

    sessions.spawn_sweeper(config.ping_period, config.connection_check_wait, 3, cancel.clone());

    let status_machine = Arc::new(status::StatusMachine::new(renderer.clone()));

    let bus_client = bus::BusClient::new(
        config.ovos_server_url.clone(),
        Arc::clone(&coordinator),
        Arc::clone(&registry),
        renderer.clone(),
        Arc::clone(&status_machine),
    );
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            bus_client.run(cancel).await;
        });
    }

    let app_state = AppState::new(config.clone(), coordinator, sse_manager, sessions, renderer);
    let router = web::define_routes(app_state);

    let listener = tokio::net::TcpListener::bind(config.server_addr())
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.server_addr()));

    log::info!("listening on {}", config.server_addr());

    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("received SIGINT, shutting down gracefully (press again to force-quit)");
        shutdown_cancel.cancel();
        let _ = tokio::signal::ctrl_c().await;
        log::warn!("received second SIGINT, forcing exit");
        std::process::exit(130);
    });

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_cancel(cancel))
        .await
    {
        log::error!("server error: {e}");
    }
}

async fn wait_for_cancel(cancel: CancellationToken) {
    cancel.cancelled().await;
}
