//! Sales Analytics Server - Main entry point

use anyhow::Result;
use sales_common::logging::{init_logging, LogConfig};
use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sales_server::{
    api,
    config::Config,
    db,
    features::FeatureState,
    ingest::{RefreshPipeline, RefreshRunner, RefreshScheduler},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; environment variables take precedence
    let log_config = LogConfig::builder()
        .log_file_prefix("sales-server")
        .filter_directives("sales_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting Sales Analytics Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    let pipeline = RefreshPipeline::new(db_pool.clone(), config.ingest.clone());
    let runner = RefreshRunner::new(Arc::new(pipeline));

    let scheduler = if config.ingest.schedule_enabled {
        match RefreshScheduler::start(
            runner.clone(),
            &config.ingest.schedule,
            config.ingest.default_source_path.clone(),
        )
        .await
        {
            Ok(scheduler) => Some(scheduler),
            Err(e) => {
                warn!(error = %e, "Refresh scheduler failed to start; continuing without it");
                None
            },
        }
    } else {
        info!("Scheduled refresh is disabled (REFRESH_SCHEDULE_ENABLED=false)");
        None
    };

    let state = FeatureState {
        db: db_pool.clone(),
        runner: runner.clone(),
    };
    let app = api::create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    let drain_limit = Duration::from_secs(config.server.shutdown_timeout_secs);

    tokio::select! {
        result = server => result?,
        _ = async {
            shutdown.cancelled().await;
            tokio::time::sleep(drain_limit).await;
        } => {
            warn!("Open connections did not close within {}s", drain_limit.as_secs());
        },
    }

    info!("HTTP server stopped");

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "Refresh scheduler did not stop cleanly");
        }
    }

    if runner.shutdown(config.ingest.shutdown_grace()).await {
        info!("All refresh runs finished");
    }

    // A connection stuck mid-query must not keep the process alive
    if tokio::time::timeout(drain_limit, db_pool.close()).await.is_err() {
        warn!("Database pool did not close within {}s", drain_limit.as_secs());
    }
    info!("Server shut down gracefully");

    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM
async fn wait_for_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    token.cancel();
}
