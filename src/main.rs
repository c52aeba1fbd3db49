use std::sync::Arc;

use anyhow::Context;
use chain_balance::{ api, BalanceWatcher, Config, MultiChainBalanceClient };
use tokio::sync::watch;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "chain_balance=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("failed to load configuration")?;

    tracing::info!(
        "Starting chain-balance with network mode: {}, chains: {:?}",
        config.network_mode,
        config.configured_chains()
    );

    let client = Arc::new(MultiChainBalanceClient::from_config(&config)?);

    // Background watchers for WATCH targets
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut watchers = Vec::new();
    for target in &config.watch_targets {
        let watcher = BalanceWatcher::new(
            client.clone(),
            target.chain,
            target.address.clone(),
            config.watch_interval
        );
        watchers.push(tokio::spawn(watcher.run(shutdown_rx.clone())));
    }

    let state = api::AppState::new(client, Arc::new(config.networks.clone()), config.network_mode);
    let app = api::router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        }).await
        .context("server error")?;

    let _ = shutdown_tx.send(true);
    for handle in watchers {
        let _ = handle.await;
    }

    Ok(())
}
