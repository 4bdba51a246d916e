//! Users service routes

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{ApiResponse, CreateUserRequest, UpdateUserRequest},
    service::ServiceError,
    state::AppState,
};

/// Create the router for the users service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", get(find_all).post(create))
        .route("/users/:id", get(find_one).patch(update).delete(remove))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Message for a failed operation; internal failures are logged here and
/// never leak their cause
fn failure_message(operation: &str, err: &ServiceError) -> String {
    match err {
        ServiceError::Internal(source) => error!("Failed to {}: {}", operation, source),
        other => warn!("Rejected {}: {}", operation, other),
    }
    err.to_string()
}

fn user_id(id: Result<Path<i32>, PathRejection>) -> ApiResult<i32> {
    id.map(|Path(id)| id).map_err(|rejection| {
        warn!("Invalid user id: {}", rejection);
        ApiError::BadRequest("Invalid user id".to_string())
    })
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        warn!("Invalid request body: {}", rejection);
        ApiError::BadRequest(rejection.body_text())
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.user_service.health_check().await;
    let (status, label) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "users-service",
            "database": database,
        })),
    )
}

/// Create a new user
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = body(payload)?;

    state
        .user_service
        .create(&payload)
        .await
        .map_err(|e| ApiError::BadRequest(failure_message("create user", &e)))?;

    Ok(ApiResponse::message(
        StatusCode::CREATED,
        "User Created Successfully",
    ))
}

/// Get all users
pub async fn find_all(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state
        .user_service
        .find_all()
        .await
        .map_err(|e| ApiError::InternalServerError(failure_message("fetch users", &e)))?;

    Ok(ApiResponse::with_data(
        StatusCode::OK,
        users,
        "User Fetched Successfully",
    ))
}

/// Get a user by ID
pub async fn find_one(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = user_id(id)?;

    let user = state
        .user_service
        .find_one(id)
        .await
        .map_err(|e| match e {
            ServiceError::NotFound => ApiError::NotFound("User Not Found".to_string()),
            e => ApiError::InternalServerError(failure_message("fetch user", &e)),
        })?;

    Ok(ApiResponse::with_data(
        StatusCode::OK,
        user,
        "User Fetched Successfully",
    ))
}

/// Update a user by ID
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = user_id(id)?;
    let payload = body(payload)?;

    state
        .user_service
        .update(id, &payload)
        .await
        .map_err(|e| match e {
            ServiceError::NotFound => {
                ApiError::NotFound("User Not Found or Update Failed".to_string())
            }
            e => ApiError::BadRequest(failure_message("update user", &e)),
        })?;

    Ok(ApiResponse::message(
        StatusCode::OK,
        "User Updated Successfully",
    ))
}

/// Delete a user by ID
pub async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = user_id(id)?;

    state.user_service.remove(id).await.map_err(|e| match e {
        ServiceError::NotFound => {
            ApiError::NotFound("User Not Found or Deletion Failed".to_string())
        }
        e => ApiError::BadRequest(failure_message("delete user", &e)),
    })?;

    Ok(ApiResponse::message(
        StatusCode::OK,
        "User Deleted Successfully",
    ))
}
