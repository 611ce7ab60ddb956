use std::sync::Arc;

use club_registration_backend::error::AppError;
use club_registration_backend::examples::school;
use club_registration_backend::roster::{rng_from_seed, Roster};
use club_registration_backend::run_server;
use club_registration_config::get_config;
use club_registration_database::{get_database_connection, MemoryRosterStore, PgRosterStore};
use club_registration_telemetry::setup_telemetry;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // avoid putting more code here as this is outside of all spans so doesn't get traced
    setup_telemetry();

    program().await
}

#[tracing::instrument]
async fn program() -> Result<(), AppError> {
    let config = get_config()?;
    let rng = rng_from_seed(config.random_seed);

    let roster = if let Some(database_url) = &config.database_url {
        info!("using postgres database");
        Roster::new(PgRosterStore::new(get_database_connection(database_url)?), rng)
    } else {
        warn!("no database_url configured, serving the demo school from memory");
        let mut store = MemoryRosterStore::new();
        school::seed(&mut store, config.cancellation_quota).await?;
        Roster::new(store, rng)
    };

    run_server(&config, Arc::new(roster)).await?.await;
    Ok(())
}
