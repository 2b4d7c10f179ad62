use anyhow::Result;
use flicks_rs::api;
use flicks_rs::config::AppConfig;
use flicks_rs::tmdb::TmdbClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .pretty()
        .init();

    let config = AppConfig::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        tmdb_base_url = %config.upstream.base_url,
        proxy_url = config.upstream.proxy_url.as_ref().map(|url| url.as_str()),
        "loaded configuration"
    );
    if config.upstream.proxy_url.is_none() {
        warn!("FLICKS_PROXY_URL is not set; upstream calls go out directly");
    }

    let tmdb = TmdbClient::new(&config.upstream)?;
    let app = api::router(api::AppState::new(tmdb));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "starting http server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
