/// API route modules
pub mod albums;
pub mod auth;
pub mod health;
pub mod playlists;
pub mod tracks;
pub mod upload;
pub mod users;

use crate::{middleware, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Headroom on top of the upload limit for multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the `/api` router with authentication applied per route group
pub fn router(app_state: AppState) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);
    let body_limit = app_state.max_upload_bytes + MULTIPART_OVERHEAD;

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/search/users", get(users::search_users))
        .route("/tracks/:id", get(tracks::get_track))
        .route("/albums", get(albums::list_albums))
        .route("/albums/:id", get(albums::get_album))
        .route("/users/:id/playlists", get(users::list_public_playlists))
        .route("/users/:id/tracks", get(users::list_artist_tracks))
        .route("/users/:id/albums", get(users::list_artist_albums));

    // Anonymous or authenticated
    let optional_routes = Router::new()
        .route("/playlists/:id", get(playlists::get_playlist))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::optional_auth_middleware,
        ));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Users
        .route("/me", get(users::me))
        .route("/users", get(users::list_users))
        .route("/profile/avatar", post(users::upload_avatar))
        // Tracks
        .route("/tracks", post(tracks::create_track))
        .route("/tracks/:id", delete(tracks::delete_track))
        // Albums
        .route("/albums", post(albums::create_album))
        .route("/albums/:id", delete(albums::delete_album))
        .route("/albums/:id/tracks", post(albums::attach_track))
        .route(
            "/albums/:id/tracks/:track_id",
            delete(albums::detach_track),
        )
        .route("/albums/:id/cover", post(albums::upload_cover))
        // Playlists
        .route("/playlists", get(playlists::list_playlists))
        .route("/playlists", post(playlists::create_playlist))
        .route("/playlists/:id", put(playlists::update_playlist))
        .route("/playlists/:id", delete(playlists::delete_playlist))
        .route("/playlists/:id/tracks", post(playlists::add_tracks))
        .route(
            "/playlists/:id/tracks/:track_id",
            delete(playlists::remove_track),
        )
        .route("/playlists/:id/cover", post(playlists::upload_cover))
        .layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::auth_middleware,
        ));

    Router::new()
        .nest(
            "/api",
            public_routes.merge(optional_routes).merge(protected_routes),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}
