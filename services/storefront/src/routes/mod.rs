//! Storefront routes

pub mod account;
pub mod collections;
pub mod contact;
pub mod products;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde_json::{Value, json};
use tracing::warn;

use crate::{middleware::session_middleware, state::AppState};

/// Create the router for the storefront service
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route(
            "/account",
            post(account::login).delete(account::delete_account),
        )
        .route("/account/create", post(account::register))
        .route("/account/session", get(account::session_status))
        .route("/account/logout", post(account::logout))
        .route("/products", get(products::search))
        .route("/products/categories/list", get(products::categories))
        .route("/products/:id/heart", patch(collections::toggle_wishlist))
        .route("/products/:id/cart", patch(collections::toggle_cart))
        .route("/wishlist", get(collections::list_wishlist))
        .route("/wishlist/clear", delete(collections::clear_wishlist))
        .route("/wishlist/:id", patch(collections::toggle_wishlist))
        .route("/cart", get(collections::list_cart))
        .route("/cart/clear", delete(collections::clear_cart))
        .route("/cart/:id", patch(collections::toggle_cart))
        .route("/contact", post(contact::submit))
        .method_not_allowed_fallback(method_not_allowed)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .fallback(not_found);

    Router::new().nest("/api", api).with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match common::database::health_check(&state.db_pool).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    };
    let redis = state.session_manager.health_check().await.unwrap_or_else(|e| {
        warn!("Redis health check failed: {}", e);
        false
    });
    let ok = database && redis;

    Json(json!({
        "ok": ok,
        "status": if ok { "ok" } else { "degraded" },
        "service": "storefront",
        "database": database,
        "redis": redis,
    }))
}

/// Fallback for unknown API paths
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Fallback for known paths called with an unsupported method
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
