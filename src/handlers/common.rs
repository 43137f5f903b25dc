use crate::errors::{ApiError, ServiceError};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// `{"data": ...}` envelope for reads
#[derive(Debug, Serialize, ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{"message": ..., "data": ...}` envelope for writes
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse<T> {
    pub message: String,
    pub data: T,
}

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(DataResponse { data })).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(message: &str, data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(MessageResponse {
            message: message.to_string(),
            data,
        }),
    )
        .into_response()
}

/// Successful write that did not create anything
pub fn updated_response<T: Serialize>(message: &str, data: T) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: message.to_string(),
            data,
        }),
    )
        .into_response()
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Unwraps a JSON body, turning any decoding failure into a 400
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::ValidationError(rejection.body_text()))
}

/// Unwraps query parameters, turning any decoding failure into a 400
pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::ValidationError(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn created_response_wraps_message_and_data() {
        let response =
            created_response("Category created successfully", json!({"name": "Beverages"}));
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["message"], "Category created successfully");
        assert_eq!(payload["data"]["name"], "Beverages");
    }

    #[tokio::test]
    async fn success_response_wraps_data_only() {
        let response = success_response(vec![1, 2, 3]);
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload, json!({"data": [1, 2, 3]}));
    }
}
