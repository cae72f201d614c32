//! Album types

use super::{AlbumId, TrackWithArtist, UserId};
use serde::{Deserialize, Serialize};

/// An album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub created_at: String,
}

/// Data for creating a new album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub artist_id: UserId,
    pub cover_url: Option<String>,
    pub release_date: Option<String>,
}

/// Album joined with its tracks (membership order) and artist name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedAlbum {
    #[serde(flatten)]
    pub album: Album,
    pub artist_name: String, // Denormalized
    pub tracks: Vec<TrackWithArtist>,
}
