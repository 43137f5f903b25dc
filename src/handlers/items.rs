use crate::handlers::common::{
    created_response, json_body, map_service_error, query_params, success_response,
    updated_response, DataResponse, MessageResponse,
};
use crate::{
    entities::item,
    errors::{ApiError, ErrorResponse},
    services::{
        items::{CreateItemInput, UpdateItemInput},
        ItemWithParents,
    },
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query string of `GET /api/items/search`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemSearchQuery {
    /// Substring to look for, case-insensitively
    pub name: Option<String>,
}

/// Creates the router for item endpoints
pub fn items_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/search", get(search_items))
        .route("/category/:category_id", get(list_items_by_category))
        .route("/subcategory/:subcategory_id", get(list_items_by_subcategory))
        .route("/:identifier", get(get_item).put(update_item))
}

/// Create an item; `total_amount` is derived from the base amount and discount
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = CreateItemInput,
    responses(
        (status = 201, description = "Item created", body = MessageResponse<item::Model>),
        (status = 400, description = "Missing fields or store rejection", body = ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;

    let item = state
        .services
        .items
        .create_item(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response("Item created successfully", item))
}

#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "Items with parent names", body = DataResponse<Vec<ItemWithParents>>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_items()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

/// Case-insensitive substring search on item names
#[utoipa::path(
    get,
    path = "/api/items/search",
    params(ItemSearchQuery),
    responses(
        (status = 200, description = "Matching items", body = DataResponse<Vec<ItemWithParents>>),
        (status = 400, description = "Missing or malformed search term", body = ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn search_items(
    State(state): State<AppState>,
    query: Result<Query<ItemSearchQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = query_params(query)?;

    let items = state
        .services
        .items
        .search_by_name(query.name.as_deref())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/items/category/{category_id}",
    params(("category_id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Items in the category", body = DataResponse<Vec<ItemWithParents>>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn list_items_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_by_category(&category_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/items/subcategory/{subcategory_id}",
    params(("subcategory_id" = String, Path, description = "Subcategory id")),
    responses(
        (status = 200, description = "Items in the subcategory", body = DataResponse<Vec<ItemWithParents>>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn list_items_by_subcategory(
    State(state): State<AppState>,
    Path(subcategory_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_by_subcategory(&subcategory_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

/// Fetch an item by id or exact name
#[utoipa::path(
    get,
    path = "/api/items/{identifier}",
    params(("identifier" = String, Path, description = "Item id or exact name")),
    responses(
        (status = 200, description = "Item", body = DataResponse<ItemWithParents>),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .get_item(&identifier)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(item))
}

/// Update the supplied item fields and recompute the total
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(("id" = String, Path, description = "Item id")),
    request_body = UpdateItemInput,
    responses(
        (status = 200, description = "Item updated", body = MessageResponse<item::Model>),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateItemInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;

    let item = state
        .services
        .items
        .update_item(&id, input)
        .await
        .map_err(map_service_error)?;

    Ok(updated_response("Item updated successfully", item))
}
