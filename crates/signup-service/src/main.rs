//! Sign-up service - Entry point.

use account_store::{AccountStore, FileAccountStore, MemoryAccountStore};
use signup_service::{
    api::{cors_layer, create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
    RegistrationService,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting sign-up service");

    // Initialize storage
    let store: Arc<dyn AccountStore> = if config.store.persist {
        match FileAccountStore::open(config.store.path.clone()).await {
            Ok(store) => {
                info!(
                    path = %config.store.path.display(),
                    "Loaded account store with {} accounts",
                    store.count().await
                );
                Arc::new(store)
            }
            Err(e) => {
                error!(path = %config.store.path.display(), "Failed to open account store: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("Persistence disabled, using in-memory storage");
        Arc::new(MemoryAccountStore::new())
    };

    let elevation_secret = config.elevation_secret();
    if elevation_secret.is_none() {
        warn!("ADMIN_REGISTRATION_KEY not set, admin sign-up is disabled");
    }

    let service = RegistrationService::new(store, elevation_secret, config.security.clone());
    let state = AppState::new(service);

    let cors = match cors_layer(config.server.frontend_url.as_deref()) {
        Ok(layer) => layer,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    // Create router with rate limiting
    let rate_limit = RateLimitState::new(config.rate_limit.global_per_minute);
    let app = create_router_with_rate_limit(state, rate_limit).layer(cors);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
