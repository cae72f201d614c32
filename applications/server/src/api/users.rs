/// User directory API routes
use crate::{api::upload, error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use cadence_core::{Album, CatalogStore, Playlist, Track, User, UserId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/me
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<User>> {
    let user = app_state.db.get_user(auth.user_id()).await?;
    Ok(Json(user))
}

/// GET /api/users
pub async fn list_users(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    let users = app_state.db.get_all_users().await?;
    Ok(Json(users))
}

/// GET /api/search/users?q=
/// Case-insensitive username substring search
pub async fn search_users(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>> {
    let users = app_state.db.search_users(&query.q).await?;
    Ok(Json(users))
}

/// POST /api/profile/avatar
/// Multipart upload with an `avatar` image field
pub async fn upload_avatar(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<User>> {
    let url = upload::store_image(&app_state, &headers, body, "avatar").await?;
    let user = app_state.db.update_avatar(auth.user_id(), &url).await?;
    Ok(Json(user))
}

/// GET /api/users/:id/playlists
/// Public playlists created by a user
pub async fn list_public_playlists(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.db.get_public_playlists(UserId::new(id)).await?;
    Ok(Json(playlists))
}

/// GET /api/users/:id/tracks
pub async fn list_artist_tracks(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Track>>> {
    let tracks = app_state.db.get_artist_tracks(UserId::new(id)).await?;
    Ok(Json(tracks))
}

/// GET /api/users/:id/albums
pub async fn list_artist_albums(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Album>>> {
    let albums = app_state.db.get_artist_albums(UserId::new(id)).await?;
    Ok(Json(albums))
}
