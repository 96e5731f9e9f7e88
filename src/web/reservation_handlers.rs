// src/web/reservation_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::reservation::{DateQuery, Reservation, ReservationRequest, ReservationResponse},
    services::reservation_service,
    state::AppState,
    web::{extract::{JsonBody, PathParam, QueryParams}, mw_auth::CurrentUser},
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

fn to_responses(reservations: Vec<Reservation>) -> Json<Vec<ReservationResponse>> {
    Json(reservations.into_iter().map(ReservationResponse::from).collect())
}

fn access_denied(current: &CurrentUser, what: &str) -> AppError {
    tracing::warn!("User {} denied: {}", current.id(), what);
    AppError::Forbidden("Access denied".into())
}

// POST /api/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(body): JsonBody<ReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    if !current.can_act_for(body.user_id) {
        tracing::warn!("User {} tried to book for user {}.", current.id(), body.user_id);
        return Err(AppError::Forbidden("Cannot book for another user".into()));
    }
    body.validate(Utc::now().date_naive())?;

    let reservation = reservation_service::create_reservation(&state.db_pool, &body).await?;
    Ok(Json(reservation.into()))
}

// GET /api/reservations: everything for admins, own bookings otherwise
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let reservations = if current.is_admin() {
        reservation_service::find_all_reservations(&state.db_pool).await?
    } else {
        reservation_service::find_reservations_by_user(&state.db_pool, current.id()).await?
    };
    Ok(to_responses(reservations))
}

// GET /api/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(reservation_id): PathParam<i64>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = reservation_service::find_reservation_by_id(&state.db_pool, reservation_id).await?;
    if !current.can_act_for(reservation.user_id) {
        return Err(access_denied(&current, "read another user's reservation"));
    }
    Ok(Json(reservation.into()))
}

// GET /api/reservations/user/{user_id}
pub async fn get_user_reservations(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(user_id): PathParam<i64>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    if !current.can_act_for(user_id) {
        return Err(access_denied(&current, "list another user's reservations"));
    }
    let reservations = reservation_service::find_reservations_by_user(&state.db_pool, user_id).await?;
    Ok(to_responses(reservations))
}

// GET /api/reservations/date?date=YYYY-MM-DD
pub async fn get_reservations_by_date(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    QueryParams(query): QueryParams<DateQuery>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let reservations = if current.is_admin() {
        reservation_service::find_reservations_by_date(&state.db_pool, query.date).await?
    } else {
        reservation_service::find_reservations_by_date_and_user(&state.db_pool, query.date, current.id())
            .await?
    };
    Ok(to_responses(reservations))
}

// PUT /api/reservations/{id}
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(reservation_id): PathParam<i64>,
    JsonBody(body): JsonBody<ReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let existing = reservation_service::find_reservation_by_id(&state.db_pool, reservation_id).await?;
    if !current.can_act_for(existing.user_id) {
        return Err(access_denied(&current, "edit another user's reservation"));
    }
    // Owners cannot hand a booking over to someone else either
    if !current.can_act_for(body.user_id) {
        return Err(AppError::Forbidden("Cannot book for another user".into()));
    }
    body.validate(Utc::now().date_naive())?;

    let reservation = reservation_service::update_reservation(&state.db_pool, reservation_id, &body).await?;
    Ok(Json(reservation.into()))
}

// DELETE /api/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    PathParam(reservation_id): PathParam<i64>,
) -> AppResult<StatusCode> {
    let existing = reservation_service::find_reservation_by_id(&state.db_pool, reservation_id).await?;
    if !current.can_act_for(existing.user_id) {
        return Err(access_denied(&current, "cancel another user's reservation"));
    }

    reservation_service::delete_reservation(&state.db_pool, reservation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
