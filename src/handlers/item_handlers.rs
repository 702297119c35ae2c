//! HTTP handlers for item listings.
//! Extract caller identity, query and body, then delegate to `ItemService`.
//! Errors are returned as `AppError` and rendered by its `IntoResponse`.

use crate::{
    errors::AppError,
    extractors::{AuthUser, JsonBody},
    models::photo::Photo,
    services::item_service::{CreateItemParams, ItemService},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Success envelope shared by all item endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<T>,
}

impl<T> ApiResponse<T> {
    fn with_results(message: &'static str, results: T) -> Self {
        Self {
            message,
            results: Some(results),
        }
    }
}

impl ApiResponse<()> {
    fn message_only(message: &'static str) -> Self {
        Self {
            message,
            results: None,
        }
    }
}

/// Query params accepted by `POST /items`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemQuery {
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
}

/// Request body for `POST /items`. Every field is optional here so absence,
/// including an absent body, is reported as missing parameters rather than
/// a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateItemBody {
    pub title: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub photos: Option<Vec<Photo>>,
}

/// POST `/items?categoryId=&subcategoryId=` — create an item owned by the caller.
#[instrument(name = "handler::create_item", skip(service, user, query, body), fields(user_id = %user.id))]
pub async fn create_item(
    State(service): State<ItemService>,
    user: AuthUser,
    Query(query): Query<CreateItemQuery>,
    JsonBody(body): JsonBody<CreateItemBody>,
) -> Result<impl IntoResponse, AppError> {
    let params = CreateItemParams {
        title: body.title,
        condition: body.condition,
        description: body.description,
        photos: body.photos,
        category_id: query.category_id,
        subcategory_id: query.subcategory_id,
    };

    let item = service.create_item(user.id, params).await?;

    Ok(Json(ApiResponse::with_results(
        "Successfully added new item!",
        item,
    )))
}

/// GET `/public/items/{item_id}` — fetch an item, anonymous callers allowed.
#[instrument(name = "handler::get_public_item", skip(service, user), fields(authenticated = user.is_some()))]
pub async fn get_public_item(
    State(service): State<ItemService>,
    user: Option<AuthUser>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let item = service.get_item(&item_id).await?;
    Ok(Json(ApiResponse::with_results(
        "Item successfully found!",
        item,
    )))
}

/// GET `/items/{item_id}` — fetch an item as an authenticated caller.
#[instrument(name = "handler::get_item", skip(service, user), fields(user_id = %user.id))]
pub async fn get_item(
    State(service): State<ItemService>,
    user: AuthUser,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let item = service.get_item(&item_id).await?;
    Ok(Json(ApiResponse::with_results(
        "Item successfully found!",
        item,
    )))
}

/// DELETE `/items/{item_id}` — soft-delete an item.
#[instrument(name = "handler::delete_item", skip(service, user), fields(user_id = %user.id))]
pub async fn delete_item(
    State(service): State<ItemService>,
    user: AuthUser,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_item(&item_id).await?;
    Ok(Json(ApiResponse::<()>::message_only(
        "Item successfully deleted!",
    )))
}
