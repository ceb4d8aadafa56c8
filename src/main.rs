mod database;
mod handlers;
mod middleware;
mod models;
mod utils;
mod filters;

use axum::{
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
    Router,
};
use std::env;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use dotenvy::dotenv;

use database::{create_database_pool, Database};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    let db = create_database_pool(&database_url).await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Failed to run migrations");

    // The dashboard dispatch table carries a historical key that no role
    // grants; surface it at startup instead of silently repairing it.
    let catalogue = models::rbac::get_all_permissions();
    for (key, target) in models::rbac::ROLE_ROUTES {
        if !catalogue.iter().any(|p| p.key == *key) {
            log::warn!("dispatch key '{}' for {} is not a grantable permission", key, target);
        }
    }

    let app = create_router(db);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    log::info!("stockroom server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(db: Database) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::permanent("/dashboard") }))

        // Permission router
        .route("/dashboard", get(handlers::dashboard))

        // Clerk view
        .route("/clerk", get(handlers::clerk::clerk_view))
        .route("/clerk/materials", post(handlers::clerk::create_material))
        .route("/clerk/materials/:id", post(handlers::clerk::update_material))
        .route("/clerk/materials/:id/delete", post(handlers::clerk::delete_material))
        .route("/clerk/alerts/:id/clear", post(handlers::clerk::clear_alert))

        // Storage manager view
        .route("/storage-manager", get(handlers::storage_manager::storage_manager_view))
        .route("/storage-manager/select-location", post(handlers::storage_manager::select_location))
        .route("/storage-manager/locations/:id", post(handlers::storage_manager::update_location))
        .route("/storage-manager/alerts", post(handlers::storage_manager::send_alert))
        .route("/storage-manager/alerts/:id/clear", post(handlers::storage_manager::clear_alert))

        // Analyst view
        .route("/analyst", get(handlers::analyst::analyst_view))
        .route("/analyst/download", post(handlers::analyst::download_report))

        // Manager view
        .route("/manager", get(handlers::manager::manager_view))
        .route("/manager/report", post(handlers::manager::generate_report))

        // Inventory manager view
        .route("/inventory-manager", get(handlers::inventory_manager::inventory_manager_view))
        .route("/inventory-manager/locations", post(handlers::inventory_manager::create_location))
        .route("/inventory-manager/locations/:id", post(handlers::inventory_manager::update_location))
        .route("/inventory-manager/locations/:id/delete", post(handlers::inventory_manager::delete_location))
        .route("/inventory-manager/report", post(handlers::inventory_manager::generate_report))

        // Standalone report page
        .route("/reports/generate", post(handlers::reports::generate_report_view))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB of form data is plenty
        )
        .with_state(db)
}
