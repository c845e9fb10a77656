mod models;
mod handlers;
mod services;
mod middleware;
mod engine;
mod seed;
mod routes;
mod config;
mod errors;

use anyhow::Context;
use std::sync::Arc;
use crate::{
    config::{Config, StoreBackend},
    seed::SeedData,
    services::{InMemoryStore, KeyValueStore, RedisService, Repositories},
};

fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if config.store.backend == StoreBackend::Memory {
        tracing::warn!("Using the in-memory store; data is lost on restart");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let url = if config.redis.sentinel_enabled {
        config
            .redis
            .sentinel_url
            .clone()
            .context("Sentinel URL not configured")?
    } else {
        config.redis.url.clone()
    };
    let client = redis::Client::open(url).context("Failed to connect to Redis")?;
    Ok(Arc::new(RedisService::new(Arc::new(client))))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    let store = open_store(&config)?;
    let seed_hash = bcrypt::hash(&config.auth.seed_password, config.auth.bcrypt_cost)
        .context("Failed to hash seed password")?;
    let repos = Repositories::new(store, SeedData::demo(&seed_hash));
    repos
        .seed_missing()
        .await
        .context("Failed to seed the store")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = routes::build_router(repos, config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Failed to start server")?;
    Ok(())
}
