use actix_middleware::{IdentityProvider, JwtIdentityProvider};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use crypto_core::jwt::JwtKeys;
use post_service::config::{Config, DEFAULT_MAX_UPLOAD_BYTES};
use post_service::handlers::{self, AppState};
use post_service::repository::{MemoryStore, PgStore, Store};
use post_service::storage::{ImageStore, S3ImageStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,post_service=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🔧 Starting post-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "✅ Configuration loaded: env={}, http_port={}",
        config.app.env, config.app.http_port
    );

    let store: Arc<dyn Store> = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(600))
                .connect(&database.url)
                .await
                .context("Failed to connect to database")?;
            info!("✅ Database pool created");

            let store = PgStore::new(pool);
            store
                .migrate()
                .await
                .context("Failed to run database migrations")?;
            info!("✅ Database migrations completed");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let images: Option<Arc<dyn ImageStore>> = match &config.storage {
        Some(storage) => {
            let s3 = S3ImageStore::from_env(storage).await;
            info!("✅ Image storage ready: bucket={}", storage.bucket);
            Some(Arc::new(s3))
        }
        None => {
            warn!("S3_BUCKET not set, image uploads disabled");
            None
        }
    };

    let keys = JwtKeys::from_secret(&config.auth.jwt_secret, config.auth.token_ttl_days)
        .context("Failed to initialize JWT keys")?;
    let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::new(keys.clone()));

    let state = web::Data::new(AppState {
        store,
        keys,
        images,
        max_upload_bytes: config
            .storage
            .as_ref()
            .map(|s| s.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
    });

    let addr = config.http_addr();
    info!("🚀 HTTP server listening on {}", addr);

    HttpServer::new(move || {
        let identity = identity.clone();
        App::new()
            .app_data(state.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| handlers::configure(cfg, identity))
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await
    .context("HTTP server error")?;

    info!("post-service stopped");
    Ok(())
}
