//src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::middleware::auth::resolve_principal;

/// Monta o router completo. Cada handler declara o próprio requisito de
/// acesso (`RequireAccess<...>`); aqui só entra a resolução do principal.
pub fn create_router(app_state: AppState) -> Router {
    let inventory_routes = Router::new()
        .route(
            "/products",
            get(handlers::inventory::list_products).post(handlers::inventory::create_product),
        )
        .route("/products/low-stock", get(handlers::inventory::list_low_stock))
        .route(
            "/products/{id}",
            get(handlers::inventory::get_product).delete(handlers::inventory::deactivate_product),
        )
        .route("/products/{id}/stock", put(handlers::inventory::update_stock))
        .route(
            "/products/{id}/transactions",
            get(handlers::inventory::product_transactions),
        )
        .route("/transactions", get(handlers::inventory::transactions_between));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/me", get(handlers::auth::get_me))
        .nest("/api/inventory", inventory_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            resolve_principal,
        ))
        .with_state(app_state)
}
