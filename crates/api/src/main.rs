use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ready4u_api::bootstrap::ensure_admin;
use ready4u_api::config::ServerConfig;
use ready4u_api::router::build_app_router;
use ready4u_api::state::AppState;
use ready4u_events::{
    DispatcherConfig, EmailConfig, EmailDelivery, EmailSender, OutboxDispatcher, Senders,
    WhatsAppConfig, WhatsAppDelivery, WhatsAppSender,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ready4u_api=debug,ready4u_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = ready4u_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    ready4u_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    ready4u_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Bootstrap admin ---
    if let Some(admin) = &config.bootstrap_admin {
        match ensure_admin(&pool, admin).await {
            Ok(outcome) => tracing::info!(?outcome, "Bootstrap admin checked"),
            Err(e) => panic!("Failed to create bootstrap admin: {e}"),
        }
    }

    // --- Notification channels ---
    let senders = build_senders();

    // --- Outbox dispatcher ---
    let dispatcher = OutboxDispatcher::new(pool.clone(), senders.clone(), DispatcherConfig::from_env());
    let outbox_waker = dispatcher.waker();
    let dispatcher_cancel = CancellationToken::new();
    let dispatcher_cancel_clone = dispatcher_cancel.clone();
    let dispatcher_handle = tokio::spawn(async move {
        dispatcher.run(dispatcher_cancel_clone).await;
    });
    tracing::info!("Outbox dispatcher started");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        senders,
        outbox_waker,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    dispatcher_cancel.cancel();
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(shutdown_timeout, dispatcher_handle)
        .await
        .is_err()
    {
        tracing::warn!("Outbox dispatcher did not stop in time");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Build the notification channels that are configured in the environment.
///
/// A missing channel is logged and left unset; messages for it fail in the
/// outbox where admins can see them.
fn build_senders() -> Senders {
    let email: Option<Arc<dyn EmailSender>> = match EmailConfig::from_env() {
        Some(cfg) => {
            let host = cfg.smtp_host.clone();
            match EmailDelivery::new(cfg) {
                Ok(delivery) => {
                    tracing::info!(%host, "Email delivery configured");
                    Some(Arc::new(delivery))
                }
                Err(e) => {
                    tracing::error!(error = %e, %host, "Invalid SMTP settings, email delivery disabled");
                    None
                }
            }
        }
        None => {
            tracing::warn!("SMTP_HOST not set, email delivery disabled");
            None
        }
    };

    let whatsapp: Option<Arc<dyn WhatsAppSender>> = match WhatsAppConfig::from_env() {
        Some(cfg) => match WhatsAppDelivery::new(cfg) {
            Ok(delivery) => {
                tracing::info!("WhatsApp delivery configured");
                Some(Arc::new(delivery))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build WhatsApp client, delivery disabled");
                None
            }
        },
        None => {
            tracing::warn!("Twilio credentials not set, WhatsApp delivery disabled");
            None
        }
    };

    Senders::new(email, whatsapp)
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
