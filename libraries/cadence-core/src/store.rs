//! Catalog store trait

use crate::error::Result;
use crate::types::{
    Album, AlbumId, CreateAlbum, CreatePlaylist, CreateTrack, CreateUser, HydratedAlbum,
    HydratedPlaylist, Playlist, PlaylistId, Track, TrackId, UpdatePlaylist, User, UserId,
};
use async_trait::async_trait;

/// Catalog operations available to the transport layer
///
/// Every mutating method that takes an `actor` enforces ownership before
/// touching storage. Listing methods return an empty vector rather than
/// `NotFound`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Create a user account
    async fn create_user(&self, user: CreateUser) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, id: UserId) -> Result<User>;

    /// Find user by exact username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get the stored password hash for a user
    async fn get_password_hash(&self, id: UserId) -> Result<Option<String>>;

    /// Get all users
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Search users by username substring
    async fn search_users(&self, query: &str) -> Result<Vec<User>>;

    /// Replace a user's avatar URL
    async fn update_avatar(&self, id: UserId, avatar_url: &str) -> Result<User>;

    // ========================================================================
    // Tracks
    // ========================================================================

    /// Get track by ID
    async fn get_track(&self, id: TrackId) -> Result<Track>;

    /// Get tracks in the order of `ids`, skipping unknown IDs
    async fn get_tracks_by_ids(&self, ids: &[TrackId]) -> Result<Vec<Track>>;

    /// Get tracks by an artist, newest first
    async fn get_artist_tracks(&self, artist_id: UserId) -> Result<Vec<Track>>;

    /// Create a new track
    async fn create_track(&self, track: CreateTrack) -> Result<Track>;

    /// Delete a track and every membership referencing it
    async fn delete_track(&self, id: TrackId, actor: UserId) -> Result<()>;

    // ========================================================================
    // Albums
    // ========================================================================

    /// Get all albums
    async fn get_all_albums(&self) -> Result<Vec<Album>>;

    /// Get albums by an artist
    async fn get_artist_albums(&self, artist_id: UserId) -> Result<Vec<Album>>;

    /// Create a new album
    async fn create_album(&self, album: CreateAlbum) -> Result<Album>;

    /// Attach a track to an album
    async fn attach_track_to_album(
        &self,
        album_id: AlbumId,
        track_id: TrackId,
        actor: UserId,
    ) -> Result<()>;

    /// Detach a track from an album (idempotent)
    async fn detach_track_from_album(
        &self,
        album_id: AlbumId,
        track_id: TrackId,
        actor: UserId,
    ) -> Result<()>;

    /// Replace an album's cover URL
    async fn set_album_cover(&self, album_id: AlbumId, actor: UserId, url: &str)
        -> Result<Album>;

    /// Delete an album and its memberships; tracks are kept
    async fn delete_album(&self, album_id: AlbumId, actor: UserId) -> Result<()>;

    /// Get album if `actor` is its artist or an admin, `Forbidden` otherwise
    async fn get_owned_album(&self, album_id: AlbumId, actor: UserId) -> Result<Album>;

    /// Get album with its tracks and artist name
    async fn get_album_with_tracks(&self, id: AlbumId) -> Result<HydratedAlbum>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Get playlists created by `owner`
    async fn get_user_playlists(&self, owner: UserId) -> Result<Vec<Playlist>>;

    /// Get public playlists created by `creator`
    async fn get_public_playlists(&self, creator: UserId) -> Result<Vec<Playlist>>;

    /// Create a new playlist
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist>;

    /// Update title, privacy or cover
    async fn update_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        update: UpdatePlaylist,
    ) -> Result<Playlist>;

    /// Add track to playlist
    async fn add_track_to_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        track_id: TrackId,
    ) -> Result<()>;

    /// Add several tracks in order, stopping at the first failure
    async fn add_tracks_to_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        track_ids: &[TrackId],
    ) -> Result<()>;

    /// Remove track from playlist (idempotent)
    async fn remove_track_from_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        track_id: TrackId,
    ) -> Result<()>;

    /// Delete playlist
    async fn delete_playlist(&self, id: PlaylistId, actor: UserId) -> Result<()>;

    /// Get playlist if `actor` created it, `Forbidden` otherwise
    async fn get_owned_playlist(&self, id: PlaylistId, actor: UserId) -> Result<Playlist>;

    /// Get playlist with tracks, if visible to `requester`
    async fn get_playlist_with_tracks(
        &self,
        id: PlaylistId,
        requester: Option<UserId>,
    ) -> Result<HydratedPlaylist>;
}
