use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use chrono::Utc;
use tracing::{error, info};

use cc_api::{create_app, telemetry, AppState};
use cc_core::services::verification::{VerificationService, VerificationServiceConfig};
use cc_core::services::AccountService;
use cc_infra::factory::{build_adapters, build_dispatcher, build_limiter, RecordStore};
use cc_shared::config::AppConfig;

/// How often expired verification records are purged
const PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging).context("Failed to install tracing subscriber")?;

    info!(
        environment = %config.environment,
        store = ?config.verification.store,
        "Starting CraftConnect API server"
    );

    let adapters = build_adapters(&config)
        .await
        .context("Failed to initialise verification and account stores")?;
    let dispatcher = build_dispatcher(&config.delivery, config.verification.ttl_minutes)
        .context("Failed to configure code delivery")?;

    let verification = VerificationService::new(
        adapters.records.clone(),
        adapters.accounts.clone(),
        Arc::new(dispatcher),
        VerificationServiceConfig::from(&config.verification),
    )
    .with_limiter(build_limiter(&config.verification));
    let accounts = AccountService::new(adapters.accounts.clone(), config.verification.bcrypt_cost);

    let state = web::Data::new(AppState::new(
        Arc::new(verification),
        Arc::new(accounts),
        adapters.records.clone(),
        Duration::from_secs(config.server.request_timeout),
    ));

    spawn_purge_task(adapters.records.clone());

    let cors = config.cors.clone();
    let environment = config.environment;
    let bind_address = config.server.bind_address();
    info!(bind_address = %bind_address, "Server listening");

    let mut server = HttpServer::new(move || create_app(state.clone(), &cors, environment))
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server.run().await?;

    if let Some(database) = adapters.database {
        database.close().await;
    }
    info!("Server stopped");
    Ok(())
}

fn spawn_purge_task(records: Arc<RecordStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = records.purge_expired(Utc::now()).await {
                error!(error = %e, "Failed to purge expired verification records");
            }
        }
    });
}
