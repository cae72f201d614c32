//! Playlist types

use super::{PlaylistId, TrackId, TrackWithArtist, UserId};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who may see a playlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    #[default]
    Private,
}

impl Privacy {
    pub fn as_str(self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Private => "private",
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privacy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Privacy::Public),
            "private" => Ok(Privacy::Private),
            other => Err(CatalogError::invalid_argument(format!(
                "privacy must be 'public' or 'private', got '{other}'"
            ))),
        }
    }
}

/// User-owned ordered collection of tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    pub creator_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub privacy: Privacy,
    pub created_at: String,
    pub updated_at: String,
}

impl Playlist {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.creator_id == user_id
    }

    /// Public playlists are visible to everyone, private ones only to the creator.
    pub fn is_visible_to(&self, requester: Option<UserId>) -> bool {
        self.privacy == Privacy::Public || requester.is_some_and(|id| self.is_owned_by(id))
    }
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub title: String,
    pub creator_id: UserId,
    /// Defaults to private
    pub privacy: Option<Privacy>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    pub title: Option<String>,
    pub privacy: Option<Privacy>,
    pub cover_url: Option<String>,
}

impl UpdatePlaylist {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.privacy.is_none() && self.cover_url.is_none()
    }
}

/// Membership row linking a track into a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMembership {
    pub id: i64,
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub added_at: String,
}

/// Playlist joined with its tracks (added-at order) and creator name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedPlaylist {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub creator_name: String, // Denormalized
    pub tracks: Vec<TrackWithArtist>,
}
