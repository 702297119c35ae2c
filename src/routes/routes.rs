//! Defines routes for item listings and health probes.
//!
//! ## Structure
//! - **Item endpoints**
//!   - `POST   /items?categoryId=&subcategoryId=` — create item (identity required)
//!   - `GET    /items/{item_id}` — fetch item (identity required)
//!   - `DELETE /items/{item_id}` — soft-delete item (identity required)
//!   - `GET    /public/items/{item_id}` — fetch item (identity optional)
//!
//! - **Probes**
//!   - `GET /healthz`, `GET /readyz`

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        item_handlers::{create_item, delete_item, get_item, get_public_item},
    },
    services::item_service::ItemService,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build and return the router for all item routes.
///
/// The router carries shared state (`ItemService`) to all handlers.
pub fn routes() -> Router<ItemService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Item routes
        .route("/items", post(create_item))
        .route("/items/{item_id}", get(get_item).delete(delete_item))
        .route("/public/items/{item_id}", get(get_public_item))
        .layer(TraceLayer::new_for_http())
}

/// Router with state attached, ready to serve.
pub fn app(service: ItemService) -> Router {
    routes().with_state(service)
}
