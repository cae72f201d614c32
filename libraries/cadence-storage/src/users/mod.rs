//! User directory queries

use cadence_core::{error::Result, timestamp, types::*, CatalogError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;

/// Upper bound on search results
const SEARCH_LIMIT: i64 = 50;

fn from_row(row: &SqliteRow) -> std::result::Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        role: role.parse().unwrap_or_default(),
        avatar_url: row.try_get("avatar_url")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Create a user account
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let username = user.username.trim();
    if username.is_empty() {
        return Err(CatalogError::invalid_argument("username must not be empty"));
    }
    let email = user.email.trim();
    if !email.contains('@') {
        return Err(CatalogError::invalid_argument("email address is malformed"));
    }

    let result = sqlx::query(
        "INSERT INTO users (username, email, role, password_hash, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(user.role.as_str())
    .bind(&user.password_hash)
    .bind(timestamp::now())
    .execute(pool)
    .await
    .map_err(|e| match CatalogError::from(e) {
        CatalogError::Conflict(_) => CatalogError::conflict("username or email already taken"),
        other => other,
    })?;

    get(pool, UserId::new(result.last_insert_rowid())).await
}

pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, email, role, avatar_url, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row).transpose()?)
}

/// Get user by ID, failing with `NotFound`
pub async fn get(pool: &SqlitePool, id: UserId) -> Result<User> {
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("User", id))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, email, role, avatar_url, created_at FROM users WHERE username = ?",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row).transpose()?)
}

/// Get user's password hash for authentication
pub async fn get_password_hash(pool: &SqlitePool, id: UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("password_hash")))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT id, username, email, role, avatar_url, created_at FROM users ORDER BY username",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect::<std::result::Result<_, _>>()?)
}

/// Search users by username substring (case-insensitive)
///
/// No match is an empty result, not an error.
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<User>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CatalogError::invalid_argument("search query is required"));
    }

    let pattern = format!("%{}%", escape_like(query));
    let rows = sqlx::query(
        r"
        SELECT id, username, email, role, avatar_url, created_at
        FROM users
        WHERE username LIKE ? ESCAPE '\'
        ORDER BY username
        LIMIT ?
        ",
    )
    .bind(pattern)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect::<std::result::Result<_, _>>()?)
}

/// Replace a user's avatar URL
pub async fn update_avatar(pool: &SqlitePool, id: UserId, avatar_url: &str) -> Result<User> {
    let result = sqlx::query("UPDATE users SET avatar_url = ? WHERE id = ?")
        .bind(avatar_url)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("User", id));
    }

    get(pool, id).await
}

pub async fn is_admin(pool: &SqlitePool, id: UserId) -> Result<bool> {
    let row = sqlx::query("SELECT role FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some_and(|r| r.get::<String, _>("role") == Role::Admin.as_str()))
}

/// Resolve display names for a set of users
///
/// Unknown IDs are simply absent from the map.
pub async fn usernames_by_ids(
    pool: &SqlitePool,
    ids: &[UserId],
) -> Result<HashMap<UserId, String>> {
    let mut unique: Vec<UserId> = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    if unique.is_empty() {
        return Ok(HashMap::new());
    }

    let mut names: HashMap<UserId, String> = HashMap::with_capacity(unique.len());
    for chunk in unique.chunks(crate::MAX_BIND_PARAMS) {
        let mut builder =
            sqlx::QueryBuilder::<sqlx::Sqlite>::new("SELECT id, username FROM users WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        for row in builder.build().fetch_all(pool).await? {
            names.insert(row.get("id"), row.get("username"));
        }
    }

    Ok(names)
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
