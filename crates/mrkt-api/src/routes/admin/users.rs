//! User lifecycle routes
//!
//! Every route except creation runs behind the admin gate. Lookups are
//! scoped to the audience chosen by `?isAdmin=`.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use bytes::Bytes;
use mrkt_auth::hash_password;
use mrkt_core::messages::invalid_param;
use mrkt_core::{Success, validate_request};
use mrkt_db::{DbError, User};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::CurrentAdmin;
use super::types::{AudienceQuery, CreateUserRequest, DeleteUserResponse, UpdateUserRequest};
use super::{USER_PATH, USERS_PATH};

const RESOURCE: &str = "user";

/// Map store errors onto user-specific conditions
fn store_error(err: DbError) -> ApiError {
    match err {
        DbError::Duplicate(_) => ApiError::Exists(RESOURCE.to_string()),
        DbError::NotFound(_) => ApiError::NotFound(RESOURCE.to_string()),
        other => ApiError::Database(other),
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(invalid_param("id")))
}

async fn find_user(state: &AppState, id: i64, is_admin: bool) -> Result<User, ApiError> {
    state
        .db
        .get_user_by_id(id, is_admin)
        .await?
        .ok_or_else(|| ApiError::NotFound(RESOURCE.to_string()))
}

// ==================== User Routes ====================

/// POST /admin/users?isAdmin=
async fn create_user(
    State(state): State<AppState>,
    Query(query): Query<AudienceQuery>,
    body: Bytes,
) -> Result<Success<User>, ApiError> {
    let request: CreateUserRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::Internal(e.to_string()))?;

    let is_admin = query.admin_scope();

    validate_request(&request).map_err(ApiError::InvalidInput)?;

    debug!("Creating user: {} (admin: {})", request.email, is_admin);

    let password_hash = hash_password(&request.password)?;
    let user = state
        .db
        .insert_user(request.into_new_user(password_hash, is_admin))
        .await
        .map_err(store_error)?;

    metrics::counter!("mrkt_users_created_total").increment(1);
    info!("Created user {} (admin: {})", user.id, user.is_admin);

    Ok(Success(user))
}

/// GET /admin/users?isAdmin=
async fn list_users(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<AudienceQuery>,
) -> Result<Success<Vec<User>>, ApiError> {
    let users = state.db.list_users(query.admin_scope()).await?;
    Ok(Success(users))
}

/// GET /admin/users/{id}?isAdmin=
async fn get_user(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AudienceQuery>,
) -> Result<Success<User>, ApiError> {
    let id = parse_id(&id)?;
    let user = find_user(&state, id, query.admin_scope()).await?;
    Ok(Success(user))
}

/// PUT|PATCH /admin/users/{id}?isAdmin=
///
/// Partial overwrite: fields missing from the body keep their stored value.
/// The merged record is not re-validated.
async fn update_user(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AudienceQuery>,
    body: Bytes,
) -> Result<Success<User>, ApiError> {
    let id = parse_id(&id)?;
    let mut user = find_user(&state, id, query.admin_scope()).await?;

    let patch: UpdateUserRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::Internal(e.to_string()))?;

    debug!("Updating user: {}", id);

    let password_hash = patch.password.as_deref().map(hash_password).transpose()?;
    patch.apply(&mut user, password_hash);

    let user = state.db.update_user(&user).await.map_err(store_error)?;

    info!(admin_id = admin.admin_id, "Updated user {}", user.id);

    Ok(Success(user))
}

/// DELETE /admin/users/{id}?isAdmin=
async fn delete_user(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AudienceQuery>,
) -> Result<Success<DeleteUserResponse>, ApiError> {
    let id = parse_id(&id)?;
    let user = find_user(&state, id, query.admin_scope()).await?;

    debug!("Deleting user: {}", user.id);

    let deleted_count = state.db.delete_user(user.id).await?;

    info!(admin_id = admin.admin_id, "Deleted user {}", user.id);

    Ok(Success(DeleteUserResponse { deleted_count }))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(USERS_PATH, get(list_users).post(create_user))
        .route(
            USER_PATH,
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
}
