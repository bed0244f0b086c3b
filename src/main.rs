//! Mercato - A lightweight e-commerce catalog backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mercato::{
    api::{self, AppState},
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{
            SessionRepository, SqlxArticleImageRepository, SqlxArticleRepository,
            SqlxAttributeVariantRepository, SqlxCategoryRepository, SqlxSessionRepository,
            SqlxUserRepository,
        },
    },
    services::{
        article::ArticleService, attribute_variant::AttributeVariantService,
        category::CategoryService, user::UserService, wizard::WizardService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mercato=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mercato catalog backend...");

    // Load configuration
    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize cache
    let cache = create_cache(&config.cache);
    tracing::info!("Cache initialized");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let article_repo = SqlxArticleRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let variant_repo = SqlxAttributeVariantRepository::boxed(pool.clone());
    let image_repo = SqlxArticleImageRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo, session_repo.clone()));
    let article_service = Arc::new(ArticleService::new(
        article_repo,
        category_repo.clone(),
        variant_repo.clone(),
        image_repo,
        cache.clone(),
    ));
    let category_service = Arc::new(CategoryService::new(category_repo, cache.clone()));
    let attribute_variant_service =
        Arc::new(AttributeVariantService::new(variant_repo, cache.clone()));
    let wizard_service = Arc::new(WizardService::new(
        cache.clone(),
        Duration::from_secs(config.cache.wizard_ttl_seconds),
    ));

    // Periodic cleanup of expired tokens (runs hourly)
    {
        let session_repo = session_repo.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match session_repo.delete_expired().await {
                    Ok(removed) if removed > 0 => {
                        tracing::debug!("Purged {} expired session(s)", removed)
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Session cleanup failed: {}", e),
                }
            }
        });
    }

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        user_service,
        article_service,
        category_service,
        attribute_variant_service,
        wizard_service,
        upload_config: Arc::new(config.upload.clone()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
