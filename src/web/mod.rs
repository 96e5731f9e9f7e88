// src/web/mod.rs
pub mod auth_handlers;
pub mod extract;
pub mod mw_admin;
pub mod mw_auth;
pub mod reservation_handlers;
pub mod room_handlers;
pub mod routes;
pub mod user_handlers;

#[cfg(test)]
mod test;
