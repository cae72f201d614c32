use crate::{tracks, users};
use cadence_core::{error::Result, timestamp, types::*, CatalogError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn from_row(row: &SqliteRow) -> std::result::Result<Album, sqlx::Error> {
    Ok(Album {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist_id: row.try_get("artist_id")?,
        cover_url: row.try_get("cover_url")?,
        release_date: row.try_get("release_date")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Get all albums, newest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        "SELECT id, title, artist_id, cover_url, release_date, created_at
         FROM albums
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect::<std::result::Result<_, _>>()?)
}

pub async fn get_by_id(pool: &SqlitePool, id: AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(
        "SELECT id, title, artist_id, cover_url, release_date, created_at
         FROM albums
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row).transpose()?)
}

pub async fn get(pool: &SqlitePool, id: AlbumId) -> Result<Album> {
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Album", id))
}

pub async fn list_by_artist(pool: &SqlitePool, artist_id: UserId) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        "SELECT id, title, artist_id, cover_url, release_date, created_at
         FROM albums
         WHERE artist_id = ?
         ORDER BY release_date DESC, title",
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect::<std::result::Result<_, _>>()?)
}

pub async fn create(pool: &SqlitePool, album: CreateAlbum) -> Result<Album> {
    let title = album.title.trim();
    if title.is_empty() {
        return Err(CatalogError::invalid_argument("title must not be empty"));
    }
    let release_date = match album.release_date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => {
            let parsed = timestamp::parse_date(date).ok_or_else(|| {
                CatalogError::invalid_argument("release_date must be YYYY-MM-DD")
            })?;
            Some(parsed.format("%Y-%m-%d").to_string())
        }
        _ => None,
    };

    users::get(pool, album.artist_id).await?;

    let result = sqlx::query(
        "INSERT INTO albums (title, artist_id, cover_url, release_date, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(album.artist_id)
    .bind(&album.cover_url)
    .bind(release_date)
    .bind(timestamp::now())
    .execute(pool)
    .await?;

    get(pool, AlbumId::new(result.last_insert_rowid())).await
}

/// Attach a track to an album
///
/// Fails with `NotFound` when either side is missing and `Conflict` when the
/// track is already a member of this or any other album.
pub async fn attach_track(pool: &SqlitePool, album_id: AlbumId, track_id: TrackId) -> Result<()> {
    get(pool, album_id).await?;
    tracks::get(pool, track_id).await?;

    let mut tx = pool.begin().await?;

    // The unique indexes decide concurrent attaches; the loser sees Conflict
    sqlx::query("INSERT INTO album_tracks (album_id, track_id) VALUES (?, ?)")
        .bind(album_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match CatalogError::from(e) {
            CatalogError::Conflict(_) => CatalogError::conflict(format!(
                "track {track_id} already belongs to an album"
            )),
            other => other,
        })?;

    sqlx::query("UPDATE tracks SET album_id = ? WHERE id = ?")
        .bind(album_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(album_id = %album_id, track_id = %track_id, "track attached to album");

    Ok(())
}

/// Detach a track from an album
///
/// Detaching a pair that does not exist is a no-op.
pub async fn detach_track(pool: &SqlitePool, album_id: AlbumId, track_id: TrackId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM album_tracks WHERE album_id = ? AND track_id = ?")
        .bind(album_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed > 0 {
        sqlx::query("UPDATE tracks SET album_id = NULL WHERE id = ? AND album_id = ?")
            .bind(track_id)
            .bind(album_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Track IDs of an album in insertion order
pub async fn list_track_ids(pool: &SqlitePool, album_id: AlbumId) -> Result<Vec<TrackId>> {
    let rows = sqlx::query("SELECT track_id FROM album_tracks WHERE album_id = ? ORDER BY id")
        .bind(album_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|row| row.get("track_id")).collect())
}

pub async fn set_cover(pool: &SqlitePool, album_id: AlbumId, cover_url: &str) -> Result<Album> {
    let result = sqlx::query("UPDATE albums SET cover_url = ? WHERE id = ?")
        .bind(cover_url)
        .bind(album_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("Album", album_id));
    }

    get(pool, album_id).await
}

/// Delete an album and its memberships; member tracks stay in the catalog
pub async fn delete(pool: &SqlitePool, album_id: AlbumId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM album_tracks WHERE album_id = ?")
        .bind(album_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE tracks SET album_id = NULL WHERE album_id = ?")
        .bind(album_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(album_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("Album", album_id));
    }

    tx.commit().await?;

    tracing::info!(album_id = %album_id, "album deleted");

    Ok(())
}

/// Load an album and check that `actor` may manage it (its artist or an admin)
pub async fn ensure_owner(pool: &SqlitePool, album_id: AlbumId, actor: UserId) -> Result<Album> {
    let album = get(pool, album_id).await?;

    if album.artist_id == actor || users::is_admin(pool, actor).await? {
        Ok(album)
    } else {
        Err(CatalogError::forbidden("only the album's artist may modify it"))
    }
}
