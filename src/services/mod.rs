// src/services/mod.rs
pub mod auth_service;
pub mod reservation_service;
pub mod room_service;
pub mod user_service;
