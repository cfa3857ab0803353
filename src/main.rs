use std::sync::Arc;

use store_locator_graphql::{
    build_schema, router, telemetry, InMemoryStoreSource, LocatorConfig, StoreSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = LocatorConfig::load()?;
    telemetry::init_tracing(&config.log_level)?;

    let source = match &config.data_file {
        Some(path) => InMemoryStoreSource::from_file(path).await?,
        None => {
            tracing::warn!("no data file configured, serving an empty store list");
            InMemoryStoreSource::default()
        }
    };
    tracing::info!(
        stores = source.store_count(),
        categories = source.category_count(),
        "store data loaded"
    );

    let source: Arc<dyn StoreSource> = Arc::new(source);
    let schema = build_schema(source, config.schema_settings());
    let app = router(schema, &config.graphql_path);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, path = %config.graphql_path, "store locator listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received");
}
