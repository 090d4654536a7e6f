use sea_orm::Database;
use tracing::info;

use bullana_auth::config::AuthConfig;
use bullana_auth::router::build_router;
use bullana_auth::state::AppState;
use bullana_core::config::EnvConfig as _;
use bullana_crypto::DeterministicCipher;

#[tokio::main]
async fn main() {
    bullana_core::tracing::init_tracing();

    let config = AuthConfig::load();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let state = AppState {
        db,
        redis,
        token_keys: config.token_keys(),
        cipher: DeterministicCipher::new(&config.email_secret),
        origin_policy: config.origin_policy(),
        clock: Default::default(),
        totp_issuer: config.totp_issuer.clone(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
