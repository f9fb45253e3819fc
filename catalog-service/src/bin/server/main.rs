use std::sync::Arc;

use auth::Authenticator;
use catalog_service::config::Config;
use catalog_service::domain::product::service::ProductService;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::outbound::repositories::PostgresProductRepository;
use catalog_service::outbound::repositories::PostgresUserRepository;
use catalog_service::product::models::Product;
use catalog_service::product::models::ProductId;
use catalog_service::product::ports::ProductServicePort;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "catalog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_expiration_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let product_repository = Arc::new(PostgresProductRepository::new(pg_pool));

    let user_service = Arc::new(UserService::new(user_repository));
    let product_service = Arc::new(ProductService::new(product_repository));

    seed_default_catalog(&product_service).await?;

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        product_service,
        authenticator,
        config.jwt.expiration_minutes,
    );

    axum::serve(http_listener, http_application).await?;

    Ok(())
}

/// Insert a small starter catalog the first time the service runs.
async fn seed_default_catalog(
    product_service: &ProductService<PostgresProductRepository>,
) -> Result<(), anyhow::Error> {
    if !product_service.list_products().await?.is_empty() {
        return Ok(());
    }

    let defaults = [
        Product {
            id: ProductId(1),
            name: "Laptop".to_string(),
            description: "15 inch ultrabook, 16GB RAM, 512GB SSD".to_string(),
            price: 999.99,
            quantity: 10,
        },
        Product {
            id: ProductId(2),
            name: "Smartphone".to_string(),
            description: "6.1 inch display, 128GB storage".to_string(),
            price: 599.99,
            quantity: 25,
        },
        Product {
            id: ProductId(3),
            name: "Wireless Headphones".to_string(),
            description: "Over-ear, noise cancelling, 30h battery".to_string(),
            price: 129.99,
            quantity: 50,
        },
    ];

    let count = defaults.len();
    for product in defaults {
        product_service.create_product(product).await?;
    }

    tracing::info!(count, "Seeded default catalog");

    Ok(())
}
