// src/services/room_service.rs
use crate::{
    error::{AppError, AppResult},
    models::room::{Room, RoomRequest},
};
use sqlx::SqlitePool;

fn not_found(room_id: i64) -> AppError {
    AppError::NotFound(format!("Room not found: {}", room_id))
}

// --- ROOM CRUD ---

pub async fn create_room(db_pool: &SqlitePool, req: &RoomRequest) -> AppResult<Room> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        INSERT INTO rooms (number, standard, price)
        VALUES (?1, ?2, ?3)
        RETURNING id, number, standard, price
        "#,
    )
    .bind(&req.number)
    .bind(&req.standard)
    .bind(req.price)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("Room {} ({}) created with id {}.", room.number, room.standard, room.id);
    Ok(room)
}

pub async fn find_all_rooms(db_pool: &SqlitePool) -> AppResult<Vec<Room>> {
    let rooms = sqlx::query_as::<_, Room>(
        "SELECT id, number, standard, price FROM rooms ORDER BY id ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(rooms)
}

pub async fn find_room_by_id(db_pool: &SqlitePool, room_id: i64) -> AppResult<Room> {
    sqlx::query_as::<_, Room>("SELECT id, number, standard, price FROM rooms WHERE id = ?1")
        .bind(room_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| not_found(room_id))
}

// --- SEARCH ---

/// Rooms whose standard matches exactly.
pub async fn find_rooms_by_standard(db_pool: &SqlitePool, standard: &str) -> AppResult<Vec<Room>> {
    tracing::debug!("Searching rooms with standard '{}'", standard);
    let rooms = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, number, standard, price
        FROM rooms
        WHERE standard = ?1
        ORDER BY id ASC
        "#,
    )
    .bind(standard)
    .fetch_all(db_pool)
    .await?;
    Ok(rooms)
}

// --- ADMIN WRITES ---

pub async fn update_room(db_pool: &SqlitePool, room_id: i64, req: &RoomRequest) -> AppResult<Room> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        UPDATE rooms
        SET number = ?1, standard = ?2, price = ?3
        WHERE id = ?4
        RETURNING id, number, standard, price
        "#,
    )
    .bind(&req.number)
    .bind(&req.standard)
    .bind(req.price)
    .bind(room_id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| not_found(room_id))?;

    tracing::info!("Room {} updated.", room_id);
    Ok(room)
}

/// Deletes a room; its reservations go with it.
pub async fn delete_room(db_pool: &SqlitePool, room_id: i64) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM rooms WHERE id = ?1")
        .bind(room_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Cannot delete room: {} not found.", room_id);
        return Err(not_found(room_id));
    }
    tracing::info!("Room {} deleted.", room_id);
    Ok(())
}
