// src/services/reservation_service.rs
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::reservation::{Reservation, ReservationRequest},
};
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

const ALREADY_BOOKED: &str = "Room is already booked on this date.";

// Take the write lock up front: a deferred transaction that reads first
// fails with SQLITE_BUSY instead of waiting when another writer got there.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

fn not_found(reservation_id: i64) -> AppError {
    AppError::NotFound(format!("Reservation not found: {}", reservation_id))
}

// --- CONFLICT CHECK ---

/// True when another reservation holds `room_id` on `date`.
///
/// `exclude_id` leaves the reservation being edited out of the check.
pub async fn is_room_booked(
    conn: &mut SqliteConnection,
    room_id: i64,
    date: NaiveDate,
    exclude_id: Option<i64>,
) -> AppResult<bool> {
    let booked = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM reservations
            WHERE room_id = ?1 AND date = ?2 AND (?3 IS NULL OR id <> ?3)
        )
        "#,
    )
    .bind(room_id)
    .bind(date)
    .bind(exclude_id)
    .fetch_one(conn)
    .await?;
    Ok(booked)
}

// The user and room a reservation points to must exist
async fn ensure_references(conn: &mut SqliteConnection, req: &ReservationRequest) -> AppResult<()> {
    let user_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = ?1)")
        .bind(req.user_id)
        .fetch_one(&mut *conn)
        .await?;
    if !user_exists {
        return Err(AppError::NotFound(format!("User not found: {}", req.user_id)));
    }

    let room_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM rooms WHERE id = ?1)")
        .bind(req.room_id)
        .fetch_one(&mut *conn)
        .await?;
    if !room_exists {
        return Err(AppError::NotFound(format!("Room not found: {}", req.room_id)));
    }
    Ok(())
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(ALREADY_BOOKED.into())
    } else {
        e.into()
    }
}

// --- CREATE ---

/// Books a room for a user on a date, rejecting the request if the slot is taken.
pub async fn create_reservation(db_pool: &SqlitePool, req: &ReservationRequest) -> AppResult<Reservation> {
    let mut tx = db_pool.begin_with(BEGIN_WRITE).await?;

    // 1. User and room must exist
    ensure_references(&mut tx, req).await?;

    // 2. Slot must be free
    if is_room_booked(&mut tx, req.room_id, req.date, None).await? {
        tracing::warn!("Room {} is already booked on {}.", req.room_id, req.date);
        return Err(AppError::Conflict(ALREADY_BOOKED.into()));
    }

    // 3. Insert; the unique index still catches a booking that slipped past the check
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations (user_id, room_id, date)
        VALUES (?1, ?2, ?3)
        RETURNING id, user_id, room_id, date
        "#,
    )
    .bind(req.user_id)
    .bind(req.room_id)
    .bind(req.date)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_write_error)?;

    tx.commit().await?;
    tracing::info!(
        "Reservation {} created: room {} on {} for user {}.",
        reservation.id,
        reservation.room_id,
        reservation.date,
        reservation.user_id
    );
    Ok(reservation)
}

// --- QUERIES ---

pub async fn find_reservation_by_id(db_pool: &SqlitePool, reservation_id: i64) -> AppResult<Reservation> {
    sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, room_id, date FROM reservations WHERE id = ?1",
    )
    .bind(reservation_id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| not_found(reservation_id))
}

pub async fn find_all_reservations(db_pool: &SqlitePool) -> AppResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, room_id, date FROM reservations ORDER BY date ASC, id ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(reservations)
}

pub async fn find_reservations_by_user(db_pool: &SqlitePool, user_id: i64) -> AppResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, user_id, room_id, date
        FROM reservations
        WHERE user_id = ?1
        ORDER BY date ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;
    Ok(reservations)
}

pub async fn find_reservations_by_date(db_pool: &SqlitePool, date: NaiveDate) -> AppResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, room_id, date FROM reservations WHERE date = ?1 ORDER BY id ASC",
    )
    .bind(date)
    .fetch_all(db_pool)
    .await?;
    Ok(reservations)
}

pub async fn find_reservations_by_date_and_user(
    db_pool: &SqlitePool,
    date: NaiveDate,
    user_id: i64,
) -> AppResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, user_id, room_id, date
        FROM reservations
        WHERE date = ?1 AND user_id = ?2
        ORDER BY id ASC
        "#,
    )
    .bind(date)
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;
    Ok(reservations)
}

// --- UPDATE ---

/// Rewrites a reservation. Moving it onto a taken (room, date) is a conflict.
pub async fn update_reservation(
    db_pool: &SqlitePool,
    reservation_id: i64,
    req: &ReservationRequest,
) -> AppResult<Reservation> {
    let mut tx = db_pool.begin_with(BEGIN_WRITE).await?;

    // 1. Reservation must exist
    let existing = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, room_id, date FROM reservations WHERE id = ?1",
    )
    .bind(reservation_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| not_found(reservation_id))?;

    // 2. New user and room must exist
    ensure_references(&mut tx, req).await?;

    // 3. Only a move to another slot can conflict
    let slot_changed = existing.room_id != req.room_id || existing.date != req.date;
    if slot_changed && is_room_booked(&mut tx, req.room_id, req.date, Some(reservation_id)).await? {
        tracing::warn!(
            "Cannot move reservation {}: room {} is already booked on {}.",
            reservation_id,
            req.room_id,
            req.date
        );
        return Err(AppError::Conflict(ALREADY_BOOKED.into()));
    }

    // 4. Rewrite
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations
        SET user_id = ?1, room_id = ?2, date = ?3
        WHERE id = ?4
        RETURNING id, user_id, room_id, date
        "#,
    )
    .bind(req.user_id)
    .bind(req.room_id)
    .bind(req.date)
    .bind(reservation_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_write_error)?;

    tx.commit().await?;
    tracing::info!("Reservation {} updated.", reservation_id);
    Ok(reservation)
}

// --- DELETE ---

pub async fn delete_reservation(db_pool: &SqlitePool, reservation_id: i64) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM reservations WHERE id = ?1")
        .bind(reservation_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Cannot delete reservation: {} not found.", reservation_id);
        return Err(not_found(reservation_id));
    }
    tracing::info!("Reservation {} deleted.", reservation_id);
    Ok(())
}
