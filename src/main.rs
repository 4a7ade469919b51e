use std::sync::Arc;

use axum::http::Method;
use clap::Parser;
use onskeliste::config::{Cli, Config, default_config_path};
use onskeliste::handler::AppState;
use onskeliste::routes;
use onskeliste::store::{FirebaseStore, ItemStore};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Pick up WISHLIST_DB_SECRET and friends from a local .env before the
    // config file is read.
    dotenvy::dotenv().ok();

    let config_path = match args.config_path {
        Some(path) => std::path::PathBuf::from(path),
        None => default_config_path(),
    };

    tracing_subscriber::fmt().json().init();
    tracing::info!("onskeliste.svc starting");

    let cfg = Config::new(config_path.to_str().unwrap()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });

    let store: Arc<dyn ItemStore> =
        Arc::new(FirebaseStore::new(&cfg).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to reach the wishlist store");
            std::process::exit(1);
        }));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let address = format!("0.0.0.0:{}", cfg.app.get_port().to_string());
    let app = routes::routes().layer(cors).with_state(AppState { store });

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to setup tcp listener");
            std::process::exit(1);
        });

    tracing::info!("onskeliste.svc running on {}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server terminated with error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, preparing to shutdown");
        }
    }

    tracing::info!("onskeliste.svc going off, graceful shutdown complete");
}
