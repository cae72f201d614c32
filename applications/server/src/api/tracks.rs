/// Tracks API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cadence_core::{CatalogStore, CreateTrack, Track, TrackId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTrackRequest {
    pub title: String,
    /// Length in seconds
    pub duration: i64,
    pub media_url: String,
}

/// GET /api/tracks/:id
pub async fn get_track(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<Track>> {
    let track = app_state.db.get_track(TrackId::new(id)).await?;
    Ok(Json(track))
}

/// POST /api/tracks
/// Register a track; the caller becomes its artist
pub async fn create_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateTrackRequest>,
) -> Result<(StatusCode, Json<Track>)> {
    let track = app_state
        .db
        .create_track(CreateTrack {
            title: req.title,
            artist_id: auth.user_id(),
            duration: req.duration,
            media_url: req.media_url,
        })
        .await?;

    tracing::info!(track_id = %track.id, artist_id = %track.artist_id, "track created");

    Ok((StatusCode::CREATED, Json(track)))
}

/// DELETE /api/tracks/:id
/// Removes the track from every album and playlist as well
pub async fn delete_track(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state
        .db
        .delete_track(TrackId::new(id), auth.user_id())
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
