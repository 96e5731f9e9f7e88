// src/web/auth_handlers.rs
use crate::{
    error::AppResult,
    models::user::{LoginRequest, UserResponse},
    services::{auth_service, user_service},
    state::AppState,
    web::{extract::JsonBody, mw_auth::SESSION_USER_ID},
};
use axum::{extract::State, http::StatusCode, Json};
use tower_sessions::Session;

// GET /
pub async fn home() -> &'static str {
    "Welcome to the Hotel Reservation App!"
}

// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<LoginRequest>,
) -> AppResult<Json<UserResponse>> {
    tracing::info!("Login attempt for: {}", body.username);

    let user = auth_service::authenticate(&state.db_pool, &body.username, &body.password).await?;

    // Fresh session id on privilege change
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID, user.id).await?;

    tracing::info!("Login succeeded for: {}", user.username);
    Ok(Json(user_service::to_response(&state.db_pool, user).await?))
}

// POST /api/auth/logout
pub async fn handle_logout(session: Session) -> AppResult<StatusCode> {
    let user_id: Option<i64> = session.get(SESSION_USER_ID).await.ok().flatten();

    session.delete().await?;

    match user_id {
        Some(id) => tracing::info!("User {} logged out.", id),
        None => tracing::info!("Anonymous session closed."),
    }
    Ok(StatusCode::NO_CONTENT)
}
