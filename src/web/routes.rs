// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, mw_admin, mw_auth, reservation_handlers, room_handlers, user_handlers},
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Public routes ---
    let public_routes = Router::new()
        .route("/", get(auth_handlers::home))
        .route("/api/auth/login", post(auth_handlers::handle_login))
        .route("/api/auth/logout", post(auth_handlers::handle_logout))
        // Checks for a logged-in non-admin itself
        .route("/api/users/register", post(user_handlers::handle_register));

    let user_routes = Router::new()
        .route("/", get(user_handlers::list_users))
        .route(
            "/{id}",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        )
        .route("/username/{username}", get(user_handlers::get_user_by_username));

    // Room writes need the admin role; reads only a login
    let room_admin_routes = Router::new()
        .route("/", post(room_handlers::create_room))
        .route("/{id}", put(room_handlers::update_room).delete(room_handlers::delete_room))
        .route_layer(middleware::from_fn(mw_admin::require_admin));

    let room_routes = Router::new()
        .route("/", get(room_handlers::list_rooms))
        .route("/search", get(room_handlers::search_rooms))
        .route("/{id}", get(room_handlers::get_room))
        .merge(room_admin_routes);

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservation_handlers::list_reservations).post(reservation_handlers::create_reservation),
        )
        .route("/date", get(reservation_handlers::get_reservations_by_date))
        .route("/user/{user_id}", get(reservation_handlers::get_user_reservations))
        .route(
            "/{id}",
            get(reservation_handlers::get_reservation)
                .put(reservation_handlers::update_reservation)
                .delete(reservation_handlers::delete_reservation),
        );

    // --- Authenticated routes ---
    // require_auth wraps everything above, including require_admin on room writes
    let authenticated_routes = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/rooms", room_routes)
        .nest("/api/reservations", reservation_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
