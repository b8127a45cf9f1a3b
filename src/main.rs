//! Catalog Server - Local Library Catalog
//!
//! Serves the REST API. `catalog-server create-user <username> <password>
//! [--librarian] [--editor]` creates or resets an account instead.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::{
    api,
    config::AppConfig,
    models::UserPermissions,
    repository::Repository,
    services::{redis::RedisService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config);

    tracing::info!("Starting Catalog Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let redis_service = RedisService::new(&config.redis.url, config.session.ttl_seconds).await?;

    tracing::info!("Connected to Redis");

    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), Arc::new(redis_service));

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("create-user") {
        return create_user(&services, &args[1..]).await;
    }

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("catalog_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn create_user(services: &Services, args: &[String]) -> anyhow::Result<()> {
    let (username, password) = match args {
        [username, password, ..] => (username, password),
        _ => anyhow::bail!("usage: catalog-server create-user <username> <password> [--librarian] [--editor]"),
    };

    let flags = &args[2..];
    let permissions = UserPermissions {
        can_mark_returned: flags.iter().any(|f| f == "--librarian"),
        can_edit_catalog: flags.iter().any(|f| f == "--editor"),
    };

    let user = services.auth.create_user(username, password, permissions).await?;
    println!("Saved user '{}' (id {})", user.username, user.id);
    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Catalog
        .route("/", get(api::home::index))
        .route("/books", get(api::books::list_books))
        .route("/books/:id", get(api::books::get_book))
        .route(
            "/authors",
            get(api::authors::list_authors).post(api::authors::create_author),
        )
        .route(
            "/authors/:id",
            get(api::authors::get_author)
                .put(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        .route("/genres", get(api::genres::list_genres))
        .route("/genres/:id", get(api::genres::get_genre))
        .route("/languages", get(api::languages::list_languages))
        .route("/languages/:name", get(api::languages::get_language))
        .route("/instances/:id", get(api::instances::get_instance))
        // Loans
        .route(
            "/instances/:id/renew",
            get(api::instances::renewal_form).post(api::instances::renew_instance),
        )
        .route("/mybooks", get(api::loans::my_borrowed))
        .route("/borrowed", get(api::loans::all_borrowed))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
