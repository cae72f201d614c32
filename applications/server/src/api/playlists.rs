/// Playlists API routes
use crate::{
    api::upload,
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use cadence_core::{
    CatalogStore, CreatePlaylist, HydratedPlaylist, Playlist, PlaylistId, Privacy, TrackId,
    UpdatePlaylist,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub title: String,
    /// `public` or `private`, defaults to private
    #[serde(default)]
    pub privacy: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
}

fn parse_privacy(privacy: Option<&str>) -> Result<Option<Privacy>> {
    Ok(privacy.map(str::parse::<Privacy>).transpose()?)
}

/// Either a single track or an ordered batch
#[derive(Debug, Deserialize)]
pub struct AddTracksRequest {
    #[serde(default)]
    pub track_id: Option<TrackId>,
    #[serde(default)]
    pub track_ids: Option<Vec<TrackId>>,
}

/// GET /api/playlists
/// Playlists created by the authenticated user
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.db.get_user_playlists(auth.user_id()).await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let playlist = app_state
        .db
        .create_playlist(CreatePlaylist {
            title: req.title,
            creator_id: auth.user_id(),
            privacy: parse_privacy(req.privacy.as_deref())?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id
/// Playlist with its tracks in the order they were added
///
/// Private playlists answer 404 to anyone but their creator.
pub async fn get_playlist(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: Option<AuthenticatedUser>,
) -> Result<Json<HydratedPlaylist>> {
    let requester = auth.map(|a| a.user_id());
    let playlist = app_state
        .db
        .get_playlist_with_tracks(PlaylistId::new(id), requester)
        .await?;

    Ok(Json(playlist))
}

/// PUT /api/playlists/:id
/// Partial update of title and/or privacy
pub async fn update_playlist(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let update = UpdatePlaylist {
        title: req.title,
        privacy: parse_privacy(req.privacy.as_deref())?,
        cover_url: None,
    };
    if update.is_empty() {
        return Err(ServerError::BadRequest("Nothing to update".to_string()));
    }

    let playlist = app_state
        .db
        .update_playlist(PlaylistId::new(id), auth.user_id(), update)
        .await?;

    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state
        .db
        .delete_playlist(PlaylistId::new(id), auth.user_id())
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/playlists/:id/tracks
/// Body is `{"track_id": n}` or `{"track_ids": [n, ...]}`
pub async fn add_tracks(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddTracksRequest>,
) -> Result<Json<serde_json::Value>> {
    let playlist_id = PlaylistId::new(id);

    match (req.track_id, req.track_ids) {
        (Some(track_id), None) => {
            app_state
                .db
                .add_track_to_playlist(playlist_id, auth.user_id(), track_id)
                .await?;
        }
        (None, Some(track_ids)) if !track_ids.is_empty() => {
            app_state
                .db
                .add_tracks_to_playlist(playlist_id, auth.user_id(), &track_ids)
                .await?;
        }
        _ => {
            return Err(ServerError::BadRequest(
                "Provide either track_id or a non-empty track_ids".to_string(),
            ));
        }
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_track(
    Path((id, track_id)): Path<(i64, i64)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state
        .db
        .remove_track_from_playlist(PlaylistId::new(id), auth.user_id(), TrackId::new(track_id))
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/playlists/:id/cover
/// Multipart upload with a `cover` image field
pub async fn upload_cover(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Playlist>> {
    let playlist_id = PlaylistId::new(id);

    // Check ownership before storing anything
    app_state
        .db
        .get_owned_playlist(playlist_id, auth.user_id())
        .await?;

    let url = upload::store_image(&app_state, &headers, body, "cover").await?;
    let playlist = app_state
        .db
        .update_playlist(
            playlist_id,
            auth.user_id(),
            UpdatePlaylist {
                cover_url: Some(url),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(playlist))
}
