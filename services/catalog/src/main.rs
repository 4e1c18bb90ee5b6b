use anyhow::Result;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use catalog::database;
use catalog::oauth::{FacebookCredentials, FacebookOAuth, GoogleCredentials, GoogleOAuth,
    OAuthSettings};
use catalog::repositories::{MenuItemRepository, RestaurantRepository, UserRepository};
use catalog::routes;
use catalog::state::AppState;
use common::database::{DatabaseConfig, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting catalog service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    // Load OAuth provider credentials from the local JSON files
    let oauth_settings = OAuthSettings::from_env();
    let google_oauth = GoogleOAuth::new(GoogleCredentials::load(
        &oauth_settings.google_secrets_path,
    )?)?;
    let facebook_oauth = FacebookOAuth::new(FacebookCredentials::load(
        &oauth_settings.facebook_secrets_path,
    )?);

    info!("Catalog service initialized successfully");

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let restaurant_repository = RestaurantRepository::new(pool.clone());
    let menu_item_repository = MenuItemRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        restaurant_repository,
        menu_item_repository,
        google_oauth,
        facebook_oauth,
    };

    // Cookie sessions, in-memory store
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store).with_secure(false);

    // Start the web server
    let app = routes::create_router(app_state).layer(session_layer);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
    info!("Catalog service listening on 0.0.0.0:5000");

    axum::serve(listener, app).await?;

    Ok(())
}
