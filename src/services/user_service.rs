// src/services/user_service.rs
use crate::{
    config::Config,
    error::{is_unique_violation, AppError, AppResult},
    models::user::{Role, User, UserResponse, UserSummary},
    services::auth_service,
};
use sqlx::SqlitePool;

// --- LOOKUPS ---

/// Looks a user up by id.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: i64) -> AppResult<Option<User>> {
    tracing::debug!("Looking up user by id: {}", user_id);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, role
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

/// Looks a user up by username.
pub async fn find_user_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    tracing::debug!("Looking up user by username: {}", username);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, role
        FROM users
        WHERE username = ?1
        "#,
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, role
        FROM users
        ORDER BY id ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Found {} users.", users.len());
    Ok(users)
}

/// Ids of the reservations held by a user.
pub async fn reservation_ids_for_user(db_pool: &SqlitePool, user_id: i64) -> AppResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM reservations WHERE user_id = ?1 ORDER BY id ASC",
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;
    Ok(ids)
}

pub async fn to_response(db_pool: &SqlitePool, user: User) -> AppResult<UserResponse> {
    let reservations = reservation_ids_for_user(db_pool, user.id).await?;
    Ok(UserResponse::new(user, reservations))
}

fn not_found(user_id: i64) -> AppError {
    AppError::NotFound(format!("User not found: {}", user_id))
}

fn username_not_found(username: &str) -> AppError {
    AppError::NotFound(format!("User not found with username = {}", username))
}

// --- RESPONSE VIEWS (full for self/admin, summary for others) ---

pub async fn get_user_response(db_pool: &SqlitePool, user_id: i64) -> AppResult<UserResponse> {
    let user = find_user_by_id(db_pool, user_id)
        .await?
        .ok_or_else(|| not_found(user_id))?;
    to_response(db_pool, user).await
}

pub async fn get_user_summary(db_pool: &SqlitePool, user_id: i64) -> AppResult<UserSummary> {
    find_user_by_id(db_pool, user_id)
        .await?
        .map(UserSummary::from)
        .ok_or_else(|| not_found(user_id))
}

pub async fn get_user_response_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<UserResponse> {
    let user = find_user_by_username(db_pool, username)
        .await?
        .ok_or_else(|| username_not_found(username))?;
    to_response(db_pool, user).await
}

pub async fn get_user_summary_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<UserSummary> {
    find_user_by_username(db_pool, username)
        .await?
        .map(UserSummary::from)
        .ok_or_else(|| username_not_found(username))
}

pub async fn list_user_responses(db_pool: &SqlitePool) -> AppResult<Vec<UserResponse>> {
    let mut responses = Vec::new();
    for user in find_all_users(db_pool).await? {
        responses.push(to_response(db_pool, user).await?);
    }
    Ok(responses)
}

pub async fn list_user_summaries(db_pool: &SqlitePool) -> AppResult<Vec<UserSummary>> {
    Ok(find_all_users(db_pool)
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect())
}

// --- WRITES ---

/// Creates a user, hashing the raw password first.
pub async fn create_user(
    db_pool: &SqlitePool,
    username: &str,
    raw_password: &str,
    role: Role,
) -> AppResult<User> {
    tracing::info!("Creating user: {}", username);
    let password_hash = auth_service::hash_password(raw_password).await?;

    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES (?1, ?2, ?3)
        RETURNING id, username, password_hash, role
        "#,
    )
    .bind(username)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(db_pool)
    .await;

    // The UNIQUE index on username decides races between two registrations
    match result {
        Ok(user) => {
            tracing::info!("User '{}' created with id {}.", user.username, user.id);
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!("Cannot create user: username '{}' already exists.", username);
            Err(AppError::Conflict(format!("Username '{}' is already taken", username)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Replaces username, password and role of an existing user.
pub async fn update_user(
    db_pool: &SqlitePool,
    user_id: i64,
    username: &str,
    raw_password: &str,
    role: Role,
) -> AppResult<User> {
    tracing::info!("Updating user: {}", user_id);
    let password_hash = auth_service::hash_password(raw_password).await?;

    let result = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = ?1, password_hash = ?2, role = ?3
        WHERE id = ?4
        RETURNING id, username, password_hash, role
        "#,
    )
    .bind(username)
    .bind(&password_hash)
    .bind(role)
    .bind(user_id)
    .fetch_optional(db_pool)
    .await;

    match result {
        Ok(Some(user)) => {
            tracing::info!("User {} updated.", user_id);
            Ok(user)
        }
        Ok(None) => {
            tracing::warn!("Cannot update user: {} not found.", user_id);
            Err(not_found(user_id))
        }
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::Conflict(format!("Username '{}' is already taken", username)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Deletes a user together with their reservations.
pub async fn delete_user(db_pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Cannot delete user: {} not found.", user_id);
        return Err(not_found(user_id));
    }
    tracing::info!("User {} deleted.", user_id);
    Ok(())
}

// --- SEEDING ---

/// Creates the default `admin` and `user` accounts when they are missing.
pub async fn seed_default_accounts(db_pool: &SqlitePool, config: &Config) -> AppResult<()> {
    let defaults = [
        ("admin", config.seed_admin_password.as_str(), Role::Admin),
        ("user", config.seed_user_password.as_str(), Role::User),
    ];

    for (username, password, role) in defaults {
        if find_user_by_username(db_pool, username).await?.is_none() {
            create_user(db_pool, username, password, role).await?;
            tracing::info!("Seeded default account '{}' ({:?}).", username, role);
        }
    }
    Ok(())
}
