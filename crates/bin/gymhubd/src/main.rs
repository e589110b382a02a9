use gymhub_adapter_files_local::LocalFileStore;
use gymhub_adapter_http_axum::router;
use gymhub_adapter_storage_sqlite_sqlx::Config as DatabaseConfig;
use tracing_subscriber::EnvFilter;

use gymhubd::config::Config;
use gymhubd::wiring;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    // Logging
    let filter = EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?}: {err}", config.logging.filter);
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;

    // Public disk
    std::fs::create_dir_all(&config.storage.root)?;
    let files = LocalFileStore::new(&config.storage.root);

    // Services
    let state = wiring::app_state(&db, &files);
    if let Some(admin) = config.admin_credentials() {
        let user = state
            .auth_service
            .ensure_user(admin.email, admin.name, admin.password)
            .await?;
        tracing::info!(user_id = %user.id, email = %user.email, "administrator ready");
    }

    // HTTP
    let app = router::build(state, files.root());
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "gymhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("gymhubd stopped");
    Ok(())
}

/// Resolve on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
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
