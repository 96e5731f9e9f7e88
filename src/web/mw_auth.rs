// src/web/mw_auth.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
    services::{auth_service, user_service},
    state::AppState,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use sqlx::SqlitePool;
use tower_sessions::Session;

/// Session key holding the id of the logged-in user.
pub const SESSION_USER_ID: &str = "user_id";

/// The authenticated caller, put into request extensions by `require_auth`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Admins act on anything; everyone else only on what they own.
    pub fn can_act_for(&self, owner_id: i64) -> bool {
        self.is_admin() || self.id() == owner_id
    }
}

/// Resolves the caller to a user: the session first, then an
/// `Authorization: Basic` header.
///
/// A session pointing at a deleted user is treated as anonymous. Basic
/// credentials that are sent but wrong fail with `InvalidCredentials`.
pub async fn current_user(
    session: &Session,
    headers: &HeaderMap,
    db_pool: &SqlitePool,
) -> AppResult<Option<User>> {
    // --- Session ---
    if let Some(user_id) = session.get::<i64>(SESSION_USER_ID).await? {
        match user_service::find_user_by_id(db_pool, user_id).await? {
            Some(user) => return Ok(Some(user)),
            None => tracing::warn!("Session refers to user {} which no longer exists.", user_id),
        }
    }

    // --- HTTP Basic ---
    let Some((username, password)) = basic_credentials(headers)? else {
        return Ok(None);
    };
    let user = auth_service::authenticate(db_pool, &username, &password).await?;
    tracing::debug!("User '{}' authenticated with Basic credentials.", user.username);
    Ok(Some(user))
}

// `None` when there is no Basic header; a Basic header that does not decode
// to `username:password` is rejected.
fn basic_credentials(headers: &HeaderMap) -> AppResult<Option<(String, String)>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let Some(encoded) = value.to_str().ok().and_then(|v| v.strip_prefix("Basic ")) else {
        return Ok(None);
    };

    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| {
            tracing::warn!("Malformed Basic authorization header.");
            AppError::InvalidCredentials
        })?;

    match decoded.split_once(':') {
        Some((username, password)) => Ok(Some((username.to_string(), password.to_string()))),
        None => Err(AppError::InvalidCredentials),
    }
}

// Rejects requests without a logged-in user
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&session, request.headers(), &state.db_pool).await?;
    match user {
        Some(user) => {
            tracing::debug!("Auth MW: user '{}' authenticated.", user.username);
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("Auth MW: request without an authenticated user.");
            Err(AppError::Unauthorized)
        }
    }
}
