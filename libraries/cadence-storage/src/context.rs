use crate::{albums, hydration, playlists, tracks, users};
use async_trait::async_trait;
use cadence_core::{error::Result, store::CatalogStore, types::*};
use sqlx::SqlitePool;

/// Catalog backed by a `SQLite` pool
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial query to confirm the database answers
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    // Users
    async fn create_user(&self, user: CreateUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        users::get(&self.pool, id).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        users::find_by_username(&self.pool, username).await
    }

    async fn get_password_hash(&self, id: UserId) -> Result<Option<String>> {
        users::get_password_hash(&self.pool, id).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        users::search(&self.pool, query).await
    }

    async fn update_avatar(&self, id: UserId, avatar_url: &str) -> Result<User> {
        users::update_avatar(&self.pool, id, avatar_url).await
    }

    // Tracks
    async fn get_track(&self, id: TrackId) -> Result<Track> {
        tracks::get(&self.pool, id).await
    }

    async fn get_tracks_by_ids(&self, ids: &[TrackId]) -> Result<Vec<Track>> {
        tracks::list_by_ids(&self.pool, ids).await
    }

    async fn get_artist_tracks(&self, artist_id: UserId) -> Result<Vec<Track>> {
        tracks::list_by_artist(&self.pool, artist_id).await
    }

    async fn create_track(&self, track: CreateTrack) -> Result<Track> {
        tracks::create(&self.pool, track).await
    }

    async fn delete_track(&self, id: TrackId, actor: UserId) -> Result<()> {
        tracks::delete_as(&self.pool, id, actor).await
    }

    // Albums
    async fn get_all_albums(&self) -> Result<Vec<Album>> {
        albums::get_all(&self.pool).await
    }

    async fn get_artist_albums(&self, artist_id: UserId) -> Result<Vec<Album>> {
        albums::list_by_artist(&self.pool, artist_id).await
    }

    async fn create_album(&self, album: CreateAlbum) -> Result<Album> {
        albums::create(&self.pool, album).await
    }

    async fn attach_track_to_album(
        &self,
        album_id: AlbumId,
        track_id: TrackId,
        actor: UserId,
    ) -> Result<()> {
        albums::ensure_owner(&self.pool, album_id, actor).await?;
        albums::attach_track(&self.pool, album_id, track_id).await
    }

    async fn detach_track_from_album(
        &self,
        album_id: AlbumId,
        track_id: TrackId,
        actor: UserId,
    ) -> Result<()> {
        albums::ensure_owner(&self.pool, album_id, actor).await?;
        albums::detach_track(&self.pool, album_id, track_id).await
    }

    async fn set_album_cover(
        &self,
        album_id: AlbumId,
        actor: UserId,
        url: &str,
    ) -> Result<Album> {
        albums::ensure_owner(&self.pool, album_id, actor).await?;
        albums::set_cover(&self.pool, album_id, url).await
    }

    async fn delete_album(&self, album_id: AlbumId, actor: UserId) -> Result<()> {
        albums::ensure_owner(&self.pool, album_id, actor).await?;
        albums::delete(&self.pool, album_id).await
    }

    async fn get_owned_album(&self, album_id: AlbumId, actor: UserId) -> Result<Album> {
        albums::ensure_owner(&self.pool, album_id, actor).await
    }

    async fn get_album_with_tracks(&self, id: AlbumId) -> Result<HydratedAlbum> {
        hydration::hydrate_album(&self.pool, id).await
    }

    // Playlists
    async fn get_user_playlists(&self, owner: UserId) -> Result<Vec<Playlist>> {
        playlists::list_for_owner(&self.pool, owner).await
    }

    async fn get_public_playlists(&self, creator: UserId) -> Result<Vec<Playlist>> {
        playlists::list_public_by_creator(&self.pool, creator).await
    }

    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        playlists::create(&self.pool, playlist).await
    }

    async fn update_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        update: UpdatePlaylist,
    ) -> Result<Playlist> {
        playlists::update(&self.pool, id, actor, update).await
    }

    async fn add_track_to_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        track_id: TrackId,
    ) -> Result<()> {
        playlists::add_track(&self.pool, id, actor, track_id).await
    }

    async fn add_tracks_to_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        track_ids: &[TrackId],
    ) -> Result<()> {
        playlists::add_tracks(&self.pool, id, actor, track_ids).await
    }

    async fn remove_track_from_playlist(
        &self,
        id: PlaylistId,
        actor: UserId,
        track_id: TrackId,
    ) -> Result<()> {
        playlists::remove_track(&self.pool, id, actor, track_id).await
    }

    async fn delete_playlist(&self, id: PlaylistId, actor: UserId) -> Result<()> {
        playlists::delete(&self.pool, id, actor).await
    }

    async fn get_owned_playlist(&self, id: PlaylistId, actor: UserId) -> Result<Playlist> {
        playlists::get_owned(&self.pool, id, actor).await
    }

    async fn get_playlist_with_tracks(
        &self,
        id: PlaylistId,
        requester: Option<UserId>,
    ) -> Result<HydratedPlaylist> {
        hydration::hydrate_playlist(&self.pool, id, requester).await
    }
}
