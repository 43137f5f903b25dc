use crate::handlers::common::{
    created_response, json_body, map_service_error, success_response, updated_response,
    DataResponse, MessageResponse,
};
use crate::{
    entities::subcategory,
    errors::{ApiError, ErrorResponse},
    services::{
        subcategories::{CreateSubcategoryInput, UpdateSubcategoryInput},
        SubcategoryWithCategory,
    },
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

/// Creates the router for subcategory endpoints
pub fn subcategories_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subcategory).get(list_subcategories))
        .route("/category/:category_id", get(list_subcategories_by_category))
        .route("/:identifier", get(get_subcategory).put(update_subcategory))
}

/// Create a subcategory, inheriting unset tax fields from its category
#[utoipa::path(
    post,
    path = "/api/subcategories",
    request_body = CreateSubcategoryInput,
    responses(
        (status = 201, description = "Subcategory created", body = MessageResponse<subcategory::Model>),
        (status = 400, description = "Missing fields or store rejection", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "Subcategories"
)]
pub async fn create_subcategory(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubcategoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;

    let subcategory = state
        .services
        .subcategories
        .create_subcategory(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response("Subcategory created successfully", subcategory))
}

/// List every subcategory with its category name
#[utoipa::path(
    get,
    path = "/api/subcategories",
    responses(
        (status = 200, description = "Subcategories", body = DataResponse<Vec<SubcategoryWithCategory>>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Subcategories"
)]
pub async fn list_subcategories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let subcategories = state
        .services
        .subcategories
        .list_subcategories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(subcategories))
}

/// List the subcategories of one category
#[utoipa::path(
    get,
    path = "/api/subcategories/category/{category_id}",
    params(("category_id" = String, Path, description = "Parent category id")),
    responses(
        (status = 200, description = "Subcategories", body = DataResponse<Vec<subcategory::Model>>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Subcategories"
)]
pub async fn list_subcategories_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subcategories = state
        .services
        .subcategories
        .list_by_category(&category_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(subcategories))
}

/// Fetch a subcategory by id or exact name
#[utoipa::path(
    get,
    path = "/api/subcategories/{identifier}",
    params(("identifier" = String, Path, description = "Subcategory id or exact name")),
    responses(
        (status = 200, description = "Subcategory", body = DataResponse<SubcategoryWithCategory>),
        (status = 404, description = "Subcategory not found", body = ErrorResponse),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Subcategories"
)]
pub async fn get_subcategory(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subcategory = state
        .services
        .subcategories
        .get_subcategory(&identifier)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(subcategory))
}

/// Update the supplied subcategory fields
#[utoipa::path(
    put,
    path = "/api/subcategories/{id}",
    params(("id" = String, Path, description = "Subcategory id")),
    request_body = UpdateSubcategoryInput,
    responses(
        (status = 200, description = "Subcategory updated", body = MessageResponse<subcategory::Model>),
        (status = 400, description = "Store rejection", body = ErrorResponse)
    ),
    tag = "Subcategories"
)]
pub async fn update_subcategory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSubcategoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;

    let subcategory = state
        .services
        .subcategories
        .update_subcategory(&id, input)
        .await
        .map_err(map_service_error)?;

    Ok(updated_response("Subcategory updated successfully", subcategory))
}
