//! Track types

use super::{AlbumId, TrackId, UserId};
use serde::{Deserialize, Serialize};

/// A playable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist_id: UserId,
    pub album_id: Option<AlbumId>,
    /// Length in seconds
    pub duration: i64,
    pub media_url: String,
    pub created_at: String,
}

/// Data for creating a new track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrack {
    pub title: String,
    pub artist_id: UserId,
    pub duration: i64,
    pub media_url: String,
}

/// Track with the artist's display name, as used in hydrated views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackWithArtist {
    #[serde(flatten)]
    pub track: Track,
    pub artist_name: String,
}
