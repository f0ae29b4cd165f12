//! terminal-server — point-of-sale payment terminal backend
//!
//! Long-running service that:
//! - Accepts amount-first charges from payment terminals (hosted checkout)
//! - Confirms payments via processor webhooks
//! - Serves the merchant dashboard (settings, bank accounts, transactions)
//! - Enforces per-client rate and daily amount quotas

use terminal_server::config::Config;
use terminal_server::state::AppState;
use terminal_server::{api, ledger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terminal_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting terminal-server (env: {})", config.environment);

    let state = AppState::new(&config);

    if config.seed_demo {
        let _ = ledger::seed::seed_demo_merchant(&state).await;
    }

    // Hourly payment-session retention sweep
    let payments = state.payments.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let evicted = payments.sweep().await;
            if evicted > 0 {
                tracing::debug!(evicted, "Payment session sweep");
            }
        }
    });

    // Periodic guard cleanup (every 5 minutes)
    let guard = state.guard.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            guard.cleanup().await;
        }
    });

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("terminal-server HTTP listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
