use crate::handlers::common::{
    created_response, json_body, map_service_error, success_response, updated_response,
    DataResponse, MessageResponse,
};
use crate::{
    entities::category,
    errors::{ApiError, ErrorResponse},
    services::categories::{CreateCategoryInput, UpdateCategoryInput},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

/// Creates the router for category endpoints
pub fn categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route("/:identifier", get(get_category).put(update_category))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryInput,
    responses(
        (status = 201, description = "Category created", body = MessageResponse<category::Model>),
        (status = 400, description = "Missing name or store rejection", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;

    let category = state
        .services
        .categories
        .create_category(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response("Category created successfully", category))
}

/// List every category, newest first
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories", body = DataResponse<Vec<category::Model>>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .categories
        .list_categories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(categories))
}

/// Fetch a category by id or exact name
#[utoipa::path(
    get,
    path = "/api/categories/{identifier}",
    params(("identifier" = String, Path, description = "Category id or exact name")),
    responses(
        (status = 200, description = "Category", body = DataResponse<category::Model>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .categories
        .get_category(&identifier)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Update the supplied category fields
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryInput,
    responses(
        (status = 200, description = "Category updated", body = MessageResponse<category::Model>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCategoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;

    let category = state
        .services
        .categories
        .update_category(&id, input)
        .await
        .map_err(map_service_error)?;

    Ok(updated_response("Category updated successfully", category))
}
