// src/models/room.rs
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Room {
    pub id: i64,
    pub number: String,
    pub standard: String,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomRequest {
    pub number: String,
    pub standard: String,
    pub price: f64,
}

impl RoomRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.number.trim().is_empty() {
            return Err(AppError::Validation("Room number is required".into()));
        }
        if self.standard.trim().is_empty() {
            return Err(AppError::Validation("Standard is required".into()));
        }
        if self.price.is_nan() || self.price < 0.0 {
            return Err(AppError::Validation("Price must be >= 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomResponse {
    pub id: i64,
    pub number: String,
    pub standard: String,
    pub price: f64,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            number: room.number,
            standard: room.standard,
            price: room.price,
        }
    }
}
