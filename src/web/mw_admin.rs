// src/web/mw_admin.rs
use crate::{error::AppError, web::mw_auth::CurrentUser};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

/// Lets the request through only for users with the ADMIN role.
/// Must run *after* `require_auth`.
pub async fn require_admin(
    Extension(current): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // The role was loaded with the user by require_auth
    if current.is_admin() {
        tracing::debug!("Admin MW: access granted to {}", current.0.username);
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Admin MW: access denied to {} (not an admin).", current.0.username);
        Err(AppError::Forbidden("Admin role required".into()))
    }
}
