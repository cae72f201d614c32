/// Albums API routes
use crate::{api::upload, error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use cadence_core::{Album, AlbumId, CatalogStore, CreateAlbum, HydratedAlbum, TrackId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttachTrackRequest {
    pub track_id: TrackId,
}

/// GET /api/albums
pub async fn list_albums(State(app_state): State<AppState>) -> Result<Json<Vec<Album>>> {
    let albums = app_state.db.get_all_albums().await?;
    Ok(Json(albums))
}

/// POST /api/albums
pub async fn create_album(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<Album>)> {
    let album = app_state
        .db
        .create_album(CreateAlbum {
            title: req.title,
            artist_id: auth.user_id(),
            cover_url: req.cover_url,
            release_date: req.release_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(album)))
}

/// GET /api/albums/:id
/// Album with its tracks in membership order
pub async fn get_album(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<HydratedAlbum>> {
    let album = app_state.db.get_album_with_tracks(AlbumId::new(id)).await?;
    Ok(Json(album))
}

/// DELETE /api/albums/:id
/// Tracks survive; only their membership is removed
pub async fn delete_album(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state
        .db
        .delete_album(AlbumId::new(id), auth.user_id())
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/albums/:id/tracks
pub async fn attach_track(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AttachTrackRequest>,
) -> Result<Json<serde_json::Value>> {
    app_state
        .db
        .attach_track_to_album(AlbumId::new(id), req.track_id, auth.user_id())
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/albums/:id/tracks/:track_id
pub async fn detach_track(
    Path((id, track_id)): Path<(i64, i64)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state
        .db
        .detach_track_from_album(AlbumId::new(id), TrackId::new(track_id), auth.user_id())
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/albums/:id/cover
/// Multipart upload with a `cover` image field
pub async fn upload_cover(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Album>> {
    let album_id = AlbumId::new(id);

    // Check ownership before storing anything
    app_state.db.get_owned_album(album_id, auth.user_id()).await?;

    let url = upload::store_image(&app_state, &headers, body, "cover").await?;
    let album = app_state
        .db
        .set_album_cover(album_id, auth.user_id(), &url)
        .await?;

    Ok(Json(album))
}
