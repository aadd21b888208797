//! storefront-activity server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use storefront_activity::api;
use storefront_activity::app_state::AppState;
use storefront_activity::config::ActivityConfig;
use storefront_activity::domain::SystemClock;
use storefront_activity::geo::{DisabledGeoLocator, GeoLocator, HttpGeoLocator};
use storefront_activity::persistence::{self, EntityStore, EventStore, MemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ActivityConfig::from_env().context("invalid LISTEN_ADDR")?;
    init_tracing(config.log_json);
    tracing::info!(addr = %config.listen_addr, "starting storefront-activity");

    let (event_store, entity_store) = build_stores(&config).await?;
    let geo = build_geo_locator(&config)?;

    let app_state = AppState::new(
        event_store,
        entity_store,
        geo,
        Arc::new(SystemClock),
        &config,
    );
    let app = api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_stores(
    config: &ActivityConfig,
) -> anyhow::Result<(Arc<dyn EventStore>, Arc<dyn EntityStore>)> {
    if config.persistence_enabled {
        let pool = persistence::connect(config)
            .await
            .context("failed to connect to PostgreSQL")?;
        tracing::info!("using PostgreSQL persistence");
        let store = Arc::new(PostgresStore::new(pool));
        let events: Arc<dyn EventStore> = Arc::clone(&store) as Arc<dyn EventStore>;
        let entities: Arc<dyn EntityStore> = store;
        Ok((events, entities))
    } else {
        tracing::warn!("persistence disabled, events live in memory only");
        let store = Arc::new(MemoryStore::new());
        let events: Arc<dyn EventStore> = Arc::clone(&store) as Arc<dyn EventStore>;
        let entities: Arc<dyn EntityStore> = store;
        Ok((events, entities))
    }
}

fn build_geo_locator(config: &ActivityConfig) -> anyhow::Result<Arc<dyn GeoLocator>> {
    if !config.geo_lookup_enabled {
        tracing::info!("geolocation lookups disabled");
        return Ok(Arc::new(DisabledGeoLocator));
    }
    let locator = HttpGeoLocator::new(
        &config.geo_lookup_url,
        Duration::from_secs(config.geo_lookup_timeout_secs),
    )
    .context("failed to build geolocation client")?;
    Ok(Arc::new(locator))
}
