//! Read-only composite views
//!
//! Hydration never writes. Memberships and tracks are read with separate
//! queries, so a track deleted in between is skipped instead of surfacing as
//! a dangling entry.

use crate::{albums, playlists, tracks, users};
use cadence_core::{error::Result, types::*};
use sqlx::SqlitePool;

/// Album with its tracks in membership order and the artist's name
pub async fn hydrate_album(pool: &SqlitePool, album_id: AlbumId) -> Result<HydratedAlbum> {
    let album = albums::get(pool, album_id).await?;
    let track_ids = albums::list_track_ids(pool, album_id).await?;
    let tracks = tracks::list_by_ids(pool, &track_ids).await?;

    let skipped = track_ids.len() - tracks.len();
    if skipped > 0 {
        tracing::debug!(album_id = %album_id, skipped, "skipped tracks deleted during hydration");
    }

    let tracks = with_artist_names(pool, tracks, Some(album.artist_id)).await?;
    let artist_name = tracks
        .artist_name_for(album.artist_id)
        .unwrap_or_default();

    Ok(HydratedAlbum {
        album,
        artist_name,
        tracks: tracks.tracks,
    })
}

/// Playlist with its tracks in added-at order and the creator's name
///
/// Fails with `NotFound` when the playlist is missing or hidden from
/// `requester`.
pub async fn hydrate_playlist(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    requester: Option<UserId>,
) -> Result<HydratedPlaylist> {
    let playlist = playlists::visibility_filter(pool, requester, playlist_id).await?;
    let memberships = playlists::list_memberships(pool, playlist_id).await?;

    let track_ids: Vec<TrackId> = memberships.iter().map(|m| m.track_id).collect();
    let tracks = tracks::list_by_ids(pool, &track_ids).await?;

    let tracks = with_artist_names(pool, tracks, Some(playlist.creator_id)).await?;
    let creator_name = tracks
        .artist_name_for(playlist.creator_id)
        .unwrap_or_default();

    Ok(HydratedPlaylist {
        playlist,
        creator_name,
        tracks: tracks.tracks,
    })
}

struct NamedTracks {
    tracks: Vec<TrackWithArtist>,
    names: std::collections::HashMap<UserId, String>,
}

impl NamedTracks {
    fn artist_name_for(&self, id: UserId) -> Option<String> {
        self.names.get(&id).cloned()
    }
}

/// Resolve artist names for `tracks` (plus one extra user) in a single query
async fn with_artist_names(
    pool: &SqlitePool,
    tracks: Vec<Track>,
    extra: Option<UserId>,
) -> Result<NamedTracks> {
    let mut ids: Vec<UserId> = tracks.iter().map(|t| t.artist_id).collect();
    ids.extend(extra);

    let names = users::usernames_by_ids(pool, &ids).await?;

    let tracks = tracks
        .into_iter()
        .map(|track| {
            let artist_name = names.get(&track.artist_id).cloned().unwrap_or_default();
            TrackWithArtist { track, artist_name }
        })
        .collect();

    Ok(NamedTracks { tracks, names })
}
