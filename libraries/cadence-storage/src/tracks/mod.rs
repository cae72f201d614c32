//! Track catalog queries
//!
//! Tracks are the canonical playable records. Deleting one removes it from
//! every album and playlist in the same transaction.

use crate::users;
use cadence_core::{error::Result, timestamp, types::*, CatalogError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;

pub(crate) fn from_row(row: &SqliteRow) -> std::result::Result<Track, sqlx::Error> {
    Ok(Track {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist_id: row.try_get("artist_id")?,
        album_id: row.try_get("album_id")?,
        duration: row.try_get("duration")?,
        media_url: row.try_get("media_url")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, title, artist_id, album_id, duration, media_url, created_at
         FROM tracks
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row).transpose()?)
}

/// Get track by ID, failing with `NotFound`
pub async fn get(pool: &SqlitePool, id: TrackId) -> Result<Track> {
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Track", id))
}

/// Get tracks in the order given by `ids`
///
/// IDs with no matching track are skipped; repeated IDs repeat the track.
pub async fn list_by_ids(pool: &SqlitePool, ids: &[TrackId]) -> Result<Vec<Track>> {
    let mut unique: Vec<TrackId> = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id = HashMap::with_capacity(unique.len());
    for chunk in unique.chunks(crate::MAX_BIND_PARAMS) {
        let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT id, title, artist_id, album_id, duration, media_url, created_at
             FROM tracks
             WHERE id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        for row in builder.build().fetch_all(pool).await? {
            let track = from_row(&row)?;
            by_id.insert(track.id, track);
        }
    }

    Ok(ids.iter().filter_map(|id| by_id.get(id).cloned()).collect())
}

/// Get tracks by artist, newest first
pub async fn list_by_artist(pool: &SqlitePool, artist_id: UserId) -> Result<Vec<Track>> {
    let rows = sqlx::query(
        "SELECT id, title, artist_id, album_id, duration, media_url, created_at
         FROM tracks
         WHERE artist_id = ?
         ORDER BY created_at DESC, id DESC",
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect::<std::result::Result<_, _>>()?)
}

/// Create new track
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    let title = track.title.trim();
    if title.is_empty() {
        return Err(CatalogError::invalid_argument("title must not be empty"));
    }
    if track.duration < 0 {
        return Err(CatalogError::invalid_argument("duration must not be negative"));
    }
    let media_url = track.media_url.trim();
    if media_url.is_empty() {
        return Err(CatalogError::invalid_argument("media_url must not be empty"));
    }

    // Artist must exist
    users::get(pool, track.artist_id).await?;

    let result = sqlx::query(
        "INSERT INTO tracks (title, artist_id, duration, media_url, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(track.artist_id)
    .bind(track.duration)
    .bind(media_url)
    .bind(timestamp::now())
    .execute(pool)
    .await?;

    get(pool, TrackId::new(result.last_insert_rowid())).await
}

/// Delete a track along with its album and playlist memberships
pub async fn delete(pool: &SqlitePool, id: TrackId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM album_tracks WHERE track_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM playlist_tracks WHERE track_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        // Dropping the transaction rolls back the membership deletes (none existed anyway)
        return Err(CatalogError::not_found("Track", id));
    }

    tx.commit().await?;

    tracing::info!(track_id = %id, "track deleted");

    Ok(())
}

/// Delete a track on behalf of `actor`, who must be its artist or an admin
pub async fn delete_as(pool: &SqlitePool, id: TrackId, actor: UserId) -> Result<()> {
    let track = get(pool, id).await?;

    if track.artist_id != actor && !users::is_admin(pool, actor).await? {
        return Err(CatalogError::forbidden(
            "only the track's artist may delete it",
        ));
    }

    delete(pool, id).await
}
