use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use plaza_server::admission::OriginPolicy;
use plaza_server::config::{generate_config_template, Config};
use plaza_server::routes::{build_router, ApiRouters};
use plaza_server::state::AppState;
use plaza_server::ws::ChannelHub;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load config with layered precedence: defaults < TOML < env < CLI
    let config = Config::load()?;

    // Handle --generate-config: print template and exit
    if config.generate_config {
        print!("{}", generate_config_template());
        return Ok(());
    }

    // Initialize tracing/logging
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "plaza_server=info".parse().unwrap()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "plaza_server=info".parse().unwrap()),
            )
            .init();
    }

    tracing::info!("Plaza gateway v{} starting", env!("CARGO_PKG_VERSION"));

    // The hub exists before the listener binds, so context injection can
    // never observe a missing hub.
    let state = AppState {
        policy: Arc::new(OriginPolicy::new(config.client_origin.as_deref())),
        hub: ChannelHub::new(),
    };

    if config.production {
        tracing::info!(
            public_dir = %config.public_dir,
            "production mode: serving client shell for unmatched routes"
        );
    }

    // Feature routers plug in here as they come online.
    let app = build_router(&config, state, ApiRouters::default());

    // Bind and serve
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
