//! API routes for Checkmark endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use checkmark_store::{Fields, Resource, StoreError};

use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::middleware::require_bearer;
use crate::state::AppState;

/// Liveness text served at `/`
pub const LIVENESS_MESSAGE: &str = "Mock API is running";

/// Liveness check
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// Login request.
///
/// Fields are kept as raw JSON so a missing or non-string value is a failed
/// login rather than a malformed body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<Value>,
    pub password: Option<Value>,
}

/// Successful login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Login handler
pub async fn login<R: Resource>(
    State(state): State<AppState<R>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let profile = state.profile();
    let username = req.username.as_ref().and_then(Value::as_str);
    let password = req.password.as_ref().and_then(Value::as_str);

    let token = match (username, password) {
        (Some(username), Some(password)) => state.credentials().authenticate(username, password),
        _ => None,
    };

    match token {
        Some(token) => {
            tracing::info!("Login succeeded");
            Ok(Json(LoginResponse {
                message: profile.login_success.to_string(),
                token,
            }))
        }
        None => {
            tracing::info!(username = ?username, "Login rejected");
            Err(ApiError::Unauthorized(profile.login_failed.to_string()))
        }
    }
}

/// List all records in insertion order
pub async fn list_records<R: Resource>(State(state): State<AppState<R>>) -> Json<Vec<R>> {
    Json(state.store().list().await)
}

/// Create a record
pub async fn create_record<R: Resource>(
    State(state): State<AppState<R>>,
    JsonBody(body): JsonBody<R::Body>,
) -> ApiResult<(StatusCode, Json<R>)> {
    let record = state
        .store()
        .create(body.into())
        .await
        .map_err(|e| state.profile().reject(e))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Apply a partial update to a record
pub async fn update_record<R: Resource>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody<R::Body>,
) -> ApiResult<Json<R>> {
    let profile = state.profile();
    let id = parse_id::<R>(&raw_id).map_err(|e| profile.reject(e))?;
    let fields: Fields = body.into();

    let record = state
        .store()
        .update(&id, fields)
        .await
        .map_err(|e| profile.reject(e))?;

    Ok(Json(record))
}

/// Delete a record
pub async fn delete_record<R: Resource>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let profile = state.profile();
    let id = parse_id::<R>(&raw_id).map_err(|e| profile.reject(e))?;

    state
        .store()
        .delete(&id)
        .await
        .map_err(|e| profile.reject(e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Restore the store to its initial state. Test-support hook, unauthenticated.
pub async fn reset_records<R: Resource>(State(state): State<AppState<R>>) -> Json<MessageResponse> {
    state.store().reset().await;
    Json(MessageResponse {
        message: state.profile().reset_done.to_string(),
    })
}

// An unparsable id can never match a record
fn parse_id<R: Resource>(raw: &str) -> Result<R::Id, StoreError> {
    R::parse_id(raw).ok_or_else(|| StoreError::NotFound(raw.to_string()))
}

/// Build the API router for one deployment
pub fn api_router<R: Resource>(state: AppState<R>) -> Router {
    let profile = *state.profile();

    let protected = Router::new()
        .route(
            profile.collection_path,
            get(list_records::<R>).post(create_record::<R>),
        )
        .route(
            &profile.member_path(),
            put(update_record::<R>).delete(delete_record::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.guard(),
            require_bearer,
        ));

    Router::new()
        // Public endpoints
        .route("/", get(liveness))
        .route("/login", post(login::<R>))
        .route(profile.reset_path, post(reset_records::<R>))
        // Resource endpoints
        .merge(protected)
        // State
        .with_state(state)
}
