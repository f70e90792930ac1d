use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use promo_sniper::api::{AppState, build_router};
use promo_sniper::catalog::RapidApiCatalog;
use promo_sniper::config::{self, ModeConfig};
use promo_sniper::model::ManualCoupon;
use promo_sniper::notifier::TelegramNotifier;
use promo_sniper::worker::{BroadcastWorker, DiscoveryWorker};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Configuration errors are fatal; nothing starts on a bad environment.
    let config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("config load error: {e}");
            return;
        }
    };

    let notifier = match TelegramNotifier::new(&config.telegram_bot_token, config.telegram_chat_id)
    {
        Ok(n) => Arc::new(n),
        Err(e) => {
            error!("notifier init error: {e}");
            return;
        }
    };

    let coupons: Arc<Mutex<Vec<ManualCoupon>>> = Arc::new(Mutex::new(Vec::new()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = match &config.mode {
        ModeConfig::Discovery(discovery) => {
            let catalog =
                match RapidApiCatalog::new(&discovery.provider_key, &discovery.provider_host) {
                    Ok(c) => Arc::new(c),
                    Err(e) => {
                        error!("catalog init error: {e}");
                        return;
                    }
                };
            let worker = DiscoveryWorker::new(discovery.clone(), catalog, notifier.clone());
            tokio::spawn(worker.run(shutdown_rx))
        }
        ModeConfig::Broadcast { send_interval } => {
            let worker = BroadcastWorker::new(coupons.clone(), notifier.clone(), *send_interval);
            tokio::spawn(worker.run(shutdown_rx))
        }
    };

    let app = build_router(AppState { coupons });
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            return;
        }
    };
    info!("control api listening on {addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {e}");
    }

    // The server is down; interrupt the worker's sleep and let it exit.
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        error!("worker task failed: {e}");
    }
    info!("shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("received shutdown signal, starting graceful shutdown");
}
