use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gestora_api::auth::password::hash_password;
use gestora_api::config::{BootstrapConfig, ServerConfig};
use gestora_api::router::build_app_router;
use gestora_api::state::AppState;
use gestora_db::DbPool;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gestora_api=debug,gestora_db=info,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = gestora_db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    gestora_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    gestora_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    if let Some(bootstrap) = &config.bootstrap {
        bootstrap_tenant(&pool, bootstrap).await?;
    }

    // --- Router ---
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Create the configured tenant and its admin when they do not exist yet.
async fn bootstrap_tenant(
    pool: &DbPool,
    bootstrap: &BootstrapConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let password_hash = hash_password(&bootstrap.admin_password)
        .map_err(|e| format!("Failed to hash bootstrap password: {e}"))?;
    let outcome = gestora_db::bootstrap::ensure_tenant_admin(
        pool,
        &bootstrap.tenant_slug,
        &bootstrap.tenant_name,
        &bootstrap.admin_email.to_lowercase(),
        &password_hash,
    )
    .await?;

    tracing::info!(
        tenant = %outcome.tenant.slug,
        tenant_created = outcome.tenant_created,
        admin = %outcome.admin.email,
        admin_created = outcome.admin_created,
        "Bootstrap tenant ready"
    );
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
