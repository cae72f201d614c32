use crate::tracks;
use cadence_core::{error::Result, timestamp, types::*, CatalogError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn from_row(row: &SqliteRow) -> std::result::Result<Playlist, sqlx::Error> {
    let privacy: String = row.try_get("privacy")?;
    Ok(Playlist {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        creator_id: row.try_get("creator_id")?,
        cover_url: row.try_get("cover_url")?,
        privacy: privacy.parse().unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::invalid_argument("title must not be empty"));
    }
    Ok(title)
}

/// Get playlists created by a user, newest first
pub async fn list_for_owner(pool: &SqlitePool, owner_id: UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, creator_id, cover_url, privacy, created_at, updated_at
        FROM playlists
        WHERE creator_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect::<std::result::Result<_, _>>()?)
}

/// Get the public playlists of a user, newest first
pub async fn list_public_by_creator(
    pool: &SqlitePool,
    creator_id: UserId,
) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, creator_id, cover_url, privacy, created_at, updated_at
        FROM playlists
        WHERE creator_id = ? AND privacy = 'public'
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(creator_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect::<std::result::Result<_, _>>()?)
}

/// Get playlist by ID without any visibility check
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, creator_id, cover_url, privacy, created_at, updated_at
        FROM playlists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row).transpose()?)
}

/// Return the playlist only if `requester` may see it
///
/// Hidden playlists fail with `NotFound`, exactly like missing ones.
pub async fn visibility_filter(
    pool: &SqlitePool,
    requester: Option<UserId>,
    id: PlaylistId,
) -> Result<Playlist> {
    match get_by_id(pool, id).await? {
        Some(p) if p.is_visible_to(requester) => Ok(p),
        _ => Err(CatalogError::not_found("Playlist", id)),
    }
}

/// Load a playlist for mutation by `actor`
pub async fn get_owned(pool: &SqlitePool, id: PlaylistId, actor: UserId) -> Result<Playlist> {
    match get_by_id(pool, id).await? {
        Some(p) if p.is_owned_by(actor) => Ok(p),
        Some(_) => Err(CatalogError::forbidden(
            "only the playlist's creator may modify it",
        )),
        None => Err(CatalogError::not_found("Playlist", id)),
    }
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let title = validate_title(&playlist.title)?;
    let privacy = playlist.privacy.unwrap_or_default();
    let now = timestamp::now();

    let result = sqlx::query(
        r#"
        INSERT INTO playlists (title, creator_id, privacy, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(playlist.creator_id)
    .bind(privacy.as_str())
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    let id = PlaylistId::new(result.last_insert_rowid());

    tracing::debug!(playlist_id = %id, creator_id = %playlist.creator_id, "playlist created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::unavailable("failed to retrieve created playlist"))
}

/// Update the provided fields and bump `updated_at`
pub async fn update(
    pool: &SqlitePool,
    id: PlaylistId,
    actor: UserId,
    update: UpdatePlaylist,
) -> Result<Playlist> {
    let current = get_owned(pool, id, actor).await?;

    let title = match update.title.as_deref() {
        Some(title) => validate_title(title)?.to_string(),
        None => current.title,
    };
    let privacy = update.privacy.unwrap_or(current.privacy);
    let cover_url = update.cover_url.or(current.cover_url);

    sqlx::query(
        r#"
        UPDATE playlists
        SET title = ?, privacy = ?, cover_url = ?, updated_at = ?
        WHERE id = ? AND creator_id = ?
        "#,
    )
    .bind(&title)
    .bind(privacy.as_str())
    .bind(&cover_url)
    .bind(timestamp::now())
    .bind(id)
    .bind(actor)
    .execute(pool)
    .await?;

    visibility_filter(pool, Some(actor), id).await
}

/// Add track to playlist
pub async fn add_track(
    pool: &SqlitePool,
    id: PlaylistId,
    actor: UserId,
    track_id: TrackId,
) -> Result<()> {
    get_owned(pool, id, actor).await?;
    insert_membership(pool, id, track_id).await
}

/// Add several tracks in the given order
///
/// Each addition commits on its own; the first failure stops the batch and
/// leaves the earlier additions in place.
pub async fn add_tracks(
    pool: &SqlitePool,
    id: PlaylistId,
    actor: UserId,
    track_ids: &[TrackId],
) -> Result<()> {
    get_owned(pool, id, actor).await?;

    for track_id in track_ids {
        insert_membership(pool, id, *track_id).await?;
    }

    Ok(())
}

async fn insert_membership(pool: &SqlitePool, id: PlaylistId, track_id: TrackId) -> Result<()> {
    tracks::get(pool, track_id).await?;

    let now = timestamp::now();
    let mut tx = pool.begin().await?;

    // Concurrent adds of the same pair race on the unique index; the loser sees Conflict
    sqlx::query(
        "INSERT INTO playlist_tracks (playlist_id, track_id, added_at) VALUES (?, ?, ?)",
    )
    .bind(id)
    .bind(track_id)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match CatalogError::from(e) {
        CatalogError::Conflict(_) => {
            CatalogError::conflict(format!("track {track_id} is already in playlist {id}"))
        }
        other => other,
    })?;

    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Remove track from playlist
///
/// Removing a track that is not a member is a no-op.
pub async fn remove_track(
    pool: &SqlitePool,
    id: PlaylistId,
    actor: UserId,
    track_id: TrackId,
) -> Result<()> {
    get_owned(pool, id, actor).await?;

    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
        .bind(id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed > 0 {
        sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(timestamp::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Delete playlist and its memberships
pub async fn delete(pool: &SqlitePool, id: PlaylistId, actor: UserId) -> Result<()> {
    get_owned(pool, id, actor).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND creator_id = ?")
        .bind(id)
        .bind(actor)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        // Deleted concurrently
        return Err(CatalogError::not_found("Playlist", id));
    }

    tx.commit().await?;

    tracing::info!(playlist_id = %id, "playlist deleted");

    Ok(())
}

/// Membership rows in playlist order (added-at ascending, insertion order on ties)
pub async fn list_memberships(
    pool: &SqlitePool,
    id: PlaylistId,
) -> Result<Vec<PlaylistMembership>> {
    let rows = sqlx::query(
        r#"
        SELECT id, playlist_id, track_id, added_at
        FROM playlist_tracks
        WHERE playlist_id = ?
        ORDER BY added_at ASC, id ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistMembership {
            id: row.get("id"),
            playlist_id: row.get("playlist_id"),
            track_id: row.get("track_id"),
            added_at: row.get("added_at"),
        })
        .collect())
}
