use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use threads_api::{
    build_router,
    config::{Config, StorageBackend},
    revalidate::RevalidationBus,
    state::AppState,
};
use threads_persist::PersistClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Threads API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let revalidation = RevalidationBus::new();
    let builder = PersistClient::builder().revalidator(Arc::new(revalidation.clone()));

    let persist = match config.storage.backend {
        StorageBackend::Mongodb => {
            tracing::info!(database = %config.mongodb.database, "Using MongoDB store");
            builder.mongodb(&config.mongodb.database).build()?
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            builder.in_memory().build()?
        }
    };

    // Connect eagerly so a bad DATABASE_URL shows up at startup
    if let Err(e) = persist.store().ping().await {
        tracing::warn!("Store is not reachable yet: {}", e);
    }

    let state = Arc::new(AppState::new(config.clone(), persist, revalidation));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
