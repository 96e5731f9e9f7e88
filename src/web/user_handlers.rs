// src/web/user_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{Role, UserRequest, UserResponse},
    services::user_service,
    state::AppState,
    web::{extract::{JsonBody, PathParam}, mw_auth::{self, CurrentUser}},
};
use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;

// POST /api/users/register (public: anonymous or admin)
pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    JsonBody(body): JsonBody<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    let caller = mw_auth::current_user(&session, &headers, &state.db_pool).await?;

    // Logged-in non-admins may not create further accounts
    let role = match &caller {
        Some(user) if user.is_admin() => body.role.unwrap_or(Role::User),
        Some(user) => {
            tracing::warn!("User '{}' tried to register another account.", user.username);
            return Err(AppError::Forbidden(
                "Only anonymous or ADMIN may register new users".into(),
            ));
        }
        None => Role::User,
    };

    body.validate()?;
    let user = user_service::create_user(&state.db_pool, body.username.trim(), &body.password, role).await?;
    Ok(Json(user_service::to_response(&state.db_pool, user).await?))
}

// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Response> {
    if current.is_admin() {
        Ok(Json(user_service::list_user_responses(&state.db_pool).await?).into_response())
    } else {
        Ok(Json(user_service::list_user_summaries(&state.db_pool).await?).into_response())
    }
}

// GET /api/users/{id}: full view for self/admin, summary otherwise
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(user_id): PathParam<i64>,
) -> AppResult<Response> {
    if current.can_act_for(user_id) {
        Ok(Json(user_service::get_user_response(&state.db_pool, user_id).await?).into_response())
    } else {
        Ok(Json(user_service::get_user_summary(&state.db_pool, user_id).await?).into_response())
    }
}

// GET /api/users/username/{username}
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(username): PathParam<String>,
) -> AppResult<Response> {
    if current.is_admin() || current.0.username == username {
        Ok(Json(user_service::get_user_response_by_username(&state.db_pool, &username).await?)
            .into_response())
    } else {
        Ok(Json(user_service::get_user_summary_by_username(&state.db_pool, &username).await?)
            .into_response())
    }
}

// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(user_id): PathParam<i64>,
    JsonBody(body): JsonBody<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    if !current.can_act_for(user_id) {
        tracing::warn!("User {} tried to update user {}.", current.id(), user_id);
        return Err(AppError::Forbidden("Access denied".into()));
    }
    body.validate()?;

    let existing = user_service::find_user_by_id(&state.db_pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {}", user_id)))?;

    // Only admins may change roles
    let role = if current.is_admin() {
        body.role.unwrap_or(existing.role)
    } else {
        existing.role
    };

    let user = user_service::update_user(&state.db_pool, user_id, body.username.trim(), &body.password, role).await?;
    Ok(Json(user_service::to_response(&state.db_pool, user).await?))
}

// DELETE /api/users/{id} (admin, never self)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(user_id): PathParam<i64>,
) -> AppResult<StatusCode> {
    if !current.is_admin() {
        return Err(AppError::Forbidden("Access denied".into()));
    }
    if current.id() == user_id {
        return Err(AppError::Forbidden("You cannot delete your own account".into()));
    }

    user_service::delete_user(&state.db_pool, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
