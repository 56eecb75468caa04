use std::sync::Arc;

use tracing::{error, info};
use vote_backend::{
    build_rocket,
    config::AppConfig,
    processor::VoteProcessor,
    routes::AppState,
    store::{CounterStore, MemoryStore, RedisStore, MEMORY_STORE_URL},
    telemetry::{init_logging, TracingTelemetry},
};

async fn connect_store(config: &AppConfig) -> Result<Arc<dyn CounterStore>, shared::VoteError> {
    if config.redis_url == MEMORY_STORE_URL {
        info!("Using in-process counter store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = RedisStore::connect(&config.redis_url, config.store_timeout).await?;
    info!("Connected to counter store");
    Ok(Arc::new(store))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting vote server");

    let config = AppConfig::load()?;
    let store = connect_store(&config).await?;
    VoteProcessor::initialize(store.as_ref(), &config.options).await?;

    let state = AppState::new(config, store, Arc::new(TracingTelemetry));
    let _rocket = build_rocket(state).launch().await?;
    Ok(())
}

#[rocket::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        error!("Vote server failed: {}", e);
        std::process::exit(1);
    }
}
