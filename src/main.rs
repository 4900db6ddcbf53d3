mod config;
mod db;
mod predictor;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use rate_limit::RateLimiter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("database init failed");

    let predictor = match predictor::from_artifact(&config.model_path) {
        Ok(predictor) => {
            tracing::info!(kind = predictor.kind(), path = %config.model_path.display(), "predictor initialized");
            predictor
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load model artifact");
            std::process::exit(1);
        }
    };

    let limiter = match &config.rate_limit_store_url {
        Some(url) => {
            let store = rate_limit::PostgresCounterStore::connect(url)
                .await
                .expect("rate limit store init failed");
            tracing::info!("rate limiting backed by shared postgres counters");
            RateLimiter::new(Arc::new(store))
        }
        None => {
            tracing::info!("rate limiting backed by in-process counters");
            RateLimiter::in_memory()
        }
    };

    let port = config.port;
    let state = state::AppState::new(pool, Arc::new(config), predictor, limiter.clone());

    // Spawn background sweep of expired rate-limit windows.
    let _sweeper = rate_limit::spawn_sweep_task(limiter);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "pricepoint listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}
