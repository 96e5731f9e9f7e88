// src/models/mod.rs
pub mod reservation;
pub mod room;
pub mod user;
