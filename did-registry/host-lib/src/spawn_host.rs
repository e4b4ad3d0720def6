use crate::{HostAppState, HostConfig};
use did_registry::DIDRegistry;
use std::sync::Arc;
use storage_traits::LedgerStorage;

/// Spawn a DID registry host using the given HostConfig.
pub async fn spawn_host(host_config: HostConfig) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    tracing::debug!("{:?}", host_config);

    let ledger_storage_a = open_ledger_storage(&host_config).await?;
    let host_app_state = HostAppState {
        ledger_storage_a,
        did_registry: DIDRegistry::new(),
        host_config: host_config.clone(),
    };

    let middleware_stack = tower::ServiceBuilder::new()
        .layer(tower_http::compression::CompressionLayer::new())
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .layer(tower_http::cors::CorsLayer::permissive())
        .into_inner();

    let app = axum::Router::new()
        .merge(crate::services::invoke::get_routes(host_app_state))
        .layer(middleware_stack)
        .route("/health", axum::routing::get(|| async { "OK" }));

    // This has to be 0.0.0.0 otherwise it won't work in a docker container.
    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", host_config.listen_port)).await?;
    tracing::info!(
        "DID registry host listening on port {}",
        host_config.listen_port
    );

    Ok(tokio::task::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("DID registry host stopped serving: {}", err);
        }
    }))
}

async fn open_ledger_storage(host_config: &HostConfig) -> anyhow::Result<Arc<dyn LedgerStorage>> {
    if host_config.ledger_url.starts_with("memory://") {
        tracing::warn!("using in-memory ledger; its contents are lost when the host exits");
        Ok(Arc::new(did_registry_storage_mock::LedgerStorageMock::new()))
    } else if host_config.ledger_url.starts_with("sqlite://") {
        #[cfg(feature = "sqlite")]
        {
            use anyhow::Context;

            let sqlite_pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(host_config.database_max_connections)
                .acquire_timeout(std::time::Duration::from_secs(3))
                .connect(&host_config.ledger_url)
                .await
                .context("can't connect to database")?;
            let ledger_storage =
                did_registry_storage_sqlite::LedgerStorageSQLite::open_and_run_migrations(
                    sqlite_pool,
                )
                .await?;
            Ok(Arc::new(ledger_storage))
        }

        #[cfg(not(feature = "sqlite"))]
        {
            anyhow::bail!("sqlite ledger is only supported if the `sqlite` feature was enabled when building the host");
        }
    } else {
        anyhow::bail!(
            "unsupported ledger scheme; ledger URL was: {:?}",
            host_config.ledger_url
        );
    }
}
