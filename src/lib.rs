pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::cart_service::CartService;
use application::catalog_service::CatalogService;
use application::favorites_service::FavoritesService;
use application::order_service::OrderService;
use domain::ports::{CartRepository, CatalogRepository, FavoritesRepository, OrderRepository};
use errors::AppError;
use infrastructure::{
    DieselCartRepository, DieselCatalogRepository, DieselFavoritesRepository,
    DieselOrderRepository, InMemoryStore,
};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations (schema and catalog seed) against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::catalog::root,
        handlers::catalog::list_categories,
        handlers::catalog::get_category,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::list_banners,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::update_item,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::favorites::get_favorites,
        handlers::favorites::toggle_favorite,
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
    ),
    tags(
        (name = "catalog", description = "Categories, products and banners"),
        (name = "cart", description = "Per-session shopping cart"),
        (name = "favorites", description = "Per-session favorite products"),
        (name = "orders", description = "Checkout and order history"),
    )
)]
pub struct ApiDoc;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    catalog: web::Data<CatalogService>,
    cart: web::Data<CartService>,
    favorites: web::Data<FavoritesService>,
    orders: web::Data<OrderService>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        carts: Arc<dyn CartRepository>,
        favorites: Arc<dyn FavoritesRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            catalog: web::Data::new(CatalogService::new(catalog.clone())),
            cart: web::Data::new(CartService::new(carts.clone(), catalog.clone())),
            favorites: web::Data::new(FavoritesService::new(favorites, catalog.clone())),
            orders: web::Data::new(OrderService::new(orders, carts, catalog)),
        }
    }

    /// PostgreSQL-backed state.
    pub fn with_pool(pool: DbPool) -> Self {
        Self::new(
            Arc::new(DieselCatalogRepository::new(pool.clone())),
            Arc::new(DieselCartRepository::new(pool.clone())),
            Arc::new(DieselFavoritesRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool)),
        )
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    /// Register the services and the `/api` route table.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        use handlers::{cart, catalog, favorites, orders};

        cfg.app_data(self.catalog.clone())
            .app_data(self.cart.clone())
            .app_data(self.favorites.clone())
            .app_data(self.orders.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .service(
                web::scope("/api")
                    .route("/", web::get().to(catalog::root))
                    .route("/categories", web::get().to(catalog::list_categories))
                    .route("/categories/{category_id}", web::get().to(catalog::get_category))
                    .route("/products", web::get().to(catalog::list_products))
                    .route("/products/{product_id}", web::get().to(catalog::get_product))
                    .route("/banners", web::get().to(catalog::list_banners))
                    .route("/cart/{session_id}", web::get().to(cart::get_cart))
                    .route("/cart/{session_id}/add", web::post().to(cart::add_item))
                    .route("/cart/{session_id}/update", web::put().to(cart::update_item))
                    .route(
                        "/cart/{session_id}/remove/{product_id}",
                        web::delete().to(cart::remove_item),
                    )
                    .route("/cart/{session_id}/clear", web::delete().to(cart::clear_cart))
                    .route("/favorites/{session_id}", web::get().to(favorites::get_favorites))
                    .route(
                        "/favorites/{session_id}/toggle/{product_id}",
                        web::post().to(favorites::toggle_favorite),
                    )
                    .route("/orders", web::post().to(orders::create_order))
                    .route("/orders/{session_id}", web::get().to(orders::list_orders))
                    .route(
                        "/orders/{session_id}/{order_id}",
                        web::get().to(orders::get_order),
                    ),
            );
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
