use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_backend::{api, config, db, seed, state::AppState, store::SqliteBookStore, telemetry};

/// Resolve on Ctrl+C or SIGTERM / 等待退出信号
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config()?;
    tracing::info!("Server will listen on {}:{}", app_config.server.host, app_config.server.port);

    // Create data directory if not exists / 创建数据目录
    if let Some(data_dir) = app_config.get_data_dir() {
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)?;
            tracing::info!("Created data directory: {:?}", data_dir);
        }
    }

    let pool = db::connect(&app_config.get_database_url(), app_config.database.max_connections).await?;
    db::run_migrations(&pool, app_config.search.full_text).await?;

    let observer = telemetry::observer_from_config(
        app_config.telemetry.enabled,
        app_config.telemetry.delay_scale,
    );
    let store = Arc::new(SqliteBookStore::new(pool.clone()).with_observer(observer));

    if app_config.seed.enabled {
        seed::seed_if_empty(store.as_ref()).await?;
    }

    let state = Arc::new(AppState::new(store));
    let app = api::build_router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);
    tracing::info!("API docs at http://{}/api/doc/", bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
