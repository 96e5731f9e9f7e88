// src/web/room_handlers.rs
// Write routes are wrapped in `require_admin` by the router.
use crate::{
    error::AppResult,
    models::room::{RoomRequest, RoomResponse},
    services::room_service,
    state::AppState,
    web::extract::{JsonBody, PathParam, QueryParams},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StandardQuery {
    pub standard: String,
}

// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RoomRequest>,
) -> AppResult<Json<RoomResponse>> {
    body.validate()?;
    let room = room_service::create_room(&state.db_pool, &body).await?;
    Ok(Json(room.into()))
}

// GET /api/rooms
pub async fn list_rooms(State(state): State<AppState>) -> AppResult<Json<Vec<RoomResponse>>> {
    let rooms = room_service::find_all_rooms(&state.db_pool).await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

// GET /api/rooms/{id}
pub async fn get_room(
    State(state): State<AppState>,
    PathParam(room_id): PathParam<i64>,
) -> AppResult<Json<RoomResponse>> {
    Ok(Json(room_service::find_room_by_id(&state.db_pool, room_id).await?.into()))
}

// GET /api/rooms/search?standard=Deluxe
pub async fn search_rooms(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StandardQuery>,
) -> AppResult<Json<Vec<RoomResponse>>> {
    let rooms = room_service::find_rooms_by_standard(&state.db_pool, &query.standard).await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

// PUT /api/rooms/{id}
pub async fn update_room(
    State(state): State<AppState>,
    PathParam(room_id): PathParam<i64>,
    JsonBody(body): JsonBody<RoomRequest>,
) -> AppResult<Json<RoomResponse>> {
    body.validate()?;
    let room = room_service::update_room(&state.db_pool, room_id, &body).await?;
    Ok(Json(room.into()))
}

// DELETE /api/rooms/{id}
pub async fn delete_room(
    State(state): State<AppState>,
    PathParam(room_id): PathParam<i64>,
) -> AppResult<StatusCode> {
    room_service::delete_room(&state.db_pool, room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
