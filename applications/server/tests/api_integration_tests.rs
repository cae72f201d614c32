/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::StatusCode;
use cadence_core::Role;
use common::{create_test_app, multipart_request, TEST_PASSWORD};
use serde_json::json;

fn titles(body: &serde_json::Value) -> Vec<String> {
    body["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;

    let (status, body) = app.get("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

/// Protected routes reject anonymous requests with a structured error
#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = create_test_app().await;

    let (status, body) = app.get("/api/playlists", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/api/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Test login flow and token usage
#[tokio::test]
async fn test_login_flow() {
    let app = create_test_app().await;
    let (user_id, _) = app.listener("testuser").await;

    let (status, login) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "testuser", "password": TEST_PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(login["access_token"].is_string());
    assert!(login["refresh_token"].is_string());
    assert_eq!(login["token_type"], "Bearer");

    let access_token = login["access_token"].as_str().unwrap();
    let (status, me) = app.get("/api/me", Some(access_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user_id.get());
    assert_eq!(me["username"], "testuser");
    assert!(me.get("password_hash").is_none());

    // Refresh yields a working access token
    let (status, refreshed) = app
        .post(
            "/api/auth/refresh",
            None,
            json!({ "refresh_token": login["refresh_token"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get("/api/me", Some(refreshed["access_token"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);

    // A refresh token is not an access token
    let (status, _) = app
        .get("/api/me", Some(login["refresh_token"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Test login with wrong password or unknown user
#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = create_test_app().await;
    app.listener("testuser").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "testuser", "password": "wrongpassword" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "nobody", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_search() {
    let app = create_test_app().await;
    let (_, token) = app.listener("alice").await;
    app.listener("malice").await;
    app.listener("bob").await;

    let (status, body) = app.get("/api/search/users?q=ali", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = app.get("/api/search/users?q=zzz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.get("/api/search/users?q=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = app.get("/api/users", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

/// The "Drive" scenario end to end over HTTP
#[tokio::test]
async fn test_drive_playlist_scenario() {
    let app = create_test_app().await;
    let (_, alice) = app.listener("alice").await;
    let (_, bob) = app.listener("bob").await;
    let (_, artist) = app.artist("kavinsky").await;

    let nightcall = app.create_track(&artist, "Nightcall").await;
    let hero = app.create_track(&artist, "A Real Hero").await;
    let under = app.create_track(&artist, "Under Your Spell").await;

    let drive = app.create_playlist(&alice, "Drive", "private").await;
    let uri = format!("/api/playlists/{drive}");
    let tracks_uri = format!("/api/playlists/{drive}/tracks");

    let (status, _) = app
        .post(&tracks_uri, Some(&alice), json!({ "track_id": nightcall }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post(&tracks_uri, Some(&alice), json!({ "track_ids": [hero, under] }))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Adding the same track again conflicts
    let (status, body) = app
        .post(&tracks_uri, Some(&alice), json!({ "track_id": hero }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = app.get(&uri, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Drive");
    assert_eq!(body["privacy"], "private");
    assert_eq!(body["creator_name"], "alice");
    assert_eq!(titles(&body), ["Nightcall", "A Real Hero", "Under Your Spell"]);
    assert_eq!(body["tracks"][0]["artist_name"], "kavinsky");

    // Private playlists are invisible to others and to anonymous readers
    let (status, body) = app.get(&uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob cannot touch it
    let (status, body) = app
        .put(&uri, Some(&bob), json!({ "title": "Mine now" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Remove a track, then publish
    let (status, _) = app
        .delete(&format!("{tracks_uri}/{hero}"), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .put(&uri, Some(&alice), json!({ "privacy": "public" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["privacy"], "public");
    assert_eq!(body["title"], "Drive");

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["Nightcall", "Under Your Spell"]);

    // Listed under alice's public playlists
    let alice_id = body["creator_id"].as_i64().unwrap();
    let (status, body) = app
        .get(&format!("/api/users/{alice_id}/playlists"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Deleting a track drops it from the playlist
    let (status, _) = app
        .delete(&format!("/api/tracks/{nightcall}"), Some(&artist))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&uri, None).await;
    assert_eq!(titles(&body), ["Under Your Spell"]);

    let (status, _) = app.delete(&uri, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, Some(&alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_playlist_request_validation() {
    let app = create_test_app().await;
    let (_, alice) = app.listener("alice").await;

    let (status, body) = app
        .post("/api/playlists", Some(&alice), json!({ "title": "  " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    // Default privacy is private
    let (status, body) = app
        .post("/api/playlists", Some(&alice), json!({ "title": "Mix" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["privacy"], "private");
    let id = body["id"].as_i64().unwrap();

    let (status, _) = app
        .put(&format!("/api/playlists/{id}"), Some(&alice), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(
            &format!("/api/playlists/{id}"),
            Some(&alice),
            json!({ "privacy": "friends-only" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, _) = app
        .post(&format!("/api/playlists/{id}/tracks"), Some(&alice), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            &format!("/api/playlists/{id}/tracks"),
            Some(&alice),
            json!({ "track_id": 999 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app.delete("/api/playlists/4040", Some(&alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/playlists", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_album_lifecycle() {
    let app = create_test_app().await;
    let (artist_id, artist) = app.artist("m83").await;
    let (_, other) = app.artist("impostor").await;

    let (status, albums) = app.get("/api/albums", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(albums, json!([]));

    let (status, album) = app
        .post(
            "/api/albums",
            Some(&artist),
            json!({ "title": "Hurry Up, We're Dreaming", "release_date": "2011-10-18" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(album["artist_id"], artist_id.get());
    let album_id = album["id"].as_i64().unwrap();
    let album_uri = format!("/api/albums/{album_id}");

    let intro = app.create_track(&artist, "Intro").await;
    let city = app.create_track(&artist, "Midnight City").await;

    for track in [intro, city] {
        let (status, _) = app
            .post(
                &format!("{album_uri}/tracks"),
                Some(&artist),
                json!({ "track_id": track }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Attaching twice conflicts
    let (status, _) = app
        .post(
            &format!("{album_uri}/tracks"),
            Some(&artist),
            json!({ "track_id": intro }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Only the artist may change membership
    let (status, _) = app
        .post(
            &format!("{album_uri}/tracks"),
            Some(&other),
            json!({ "track_id": city }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get(&album_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["artist_name"], "m83");
    assert_eq!(titles(&body), ["Intro", "Midnight City"]);
    assert_eq!(body["tracks"][0]["album_id"], album_id);

    // Detach is idempotent
    for _ in 0..2 {
        let (status, _) = app
            .delete(&format!("{album_uri}/tracks/{intro}"), Some(&artist))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = app.delete(&album_uri, Some(&other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&album_uri, Some(&artist)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&album_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Tracks outlive the album
    let (status, track) = app.get(&format!("/api/tracks/{city}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(track["album_id"].is_null());
}

#[tokio::test]
async fn test_track_delete_requires_owner() {
    let app = create_test_app().await;
    let (_, artist) = app.artist("artist").await;
    let (_, listener) = app.listener("listener").await;
    let (_, admin) = app.user_with_role("root", Role::Admin).await;

    let first = app.create_track(&artist, "First").await;
    let second = app.create_track(&artist, "Second").await;

    let (status, _) = app
        .delete(&format!("/api/tracks/{first}"), Some(&listener))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/tracks/{first}"), Some(&artist))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .delete(&format!("/api/tracks/{second}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/tracks/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_uploads() {
    let app = create_test_app().await;
    let (_, alice) = app.listener("alice").await;
    let (_, bob) = app.listener("bob").await;
    let png = b"\x89PNG\r\n\x1a\nnot really a png";

    // Avatar
    let (status, body) = app
        .send(multipart_request(
            "/api/profile/avatar",
            &alice,
            "avatar",
            "../me.png",
            "image/png",
            png,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let avatar_url = body["avatar_url"].as_str().unwrap();
    assert!(avatar_url.starts_with("/media/"));
    assert!(avatar_url.ends_with("-me.png"));
    let stored = app.media_dir.join(avatar_url.trim_start_matches("/media/"));
    assert_eq!(std::fs::read(stored).unwrap(), png);

    // Non-image content is rejected
    let (status, body) = app
        .send(multipart_request(
            "/api/profile/avatar",
            &alice,
            "avatar",
            "notes.txt",
            "text/plain",
            b"hello",
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    // Playlist cover, owner only
    let id = app.create_playlist(&alice, "Covered", "public").await;
    let cover_uri = format!("/api/playlists/{id}/cover");

    let (status, _) = app
        .send(multipart_request(&cover_uri, &bob, "cover", "c.png", "image/png", png))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(multipart_request(&cover_uri, &alice, "cover", "c.png", "image/png", png))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["cover_url"].as_str().unwrap().ends_with("-c.png"));

    // Oversized uploads are rejected
    let big = vec![0u8; common::MAX_UPLOAD_BYTES + 1];
    let (status, _) = app
        .send(multipart_request(&cover_uri, &alice, "cover", "big.png", "image/png", &big))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_artist_listings() {
    let app = create_test_app().await;
    let (artist_id, artist) = app.artist("daft").await;
    let (listener_id, _) = app.listener("fan").await;

    app.create_track(&artist, "One More Time").await;
    app.create_track(&artist, "Digital Love").await;
    let (status, _) = app
        .post("/api/albums", Some(&artist), json!({ "title": "Discovery" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, tracks) = app
        .get(&format!("/api/users/{}/tracks", artist_id.get()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracks.as_array().unwrap().len(), 2);

    let (status, albums) = app
        .get(&format!("/api/users/{}/albums", artist_id.get()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(albums[0]["title"], "Discovery");

    // A user with no catalog gets empty lists
    let (status, tracks) = app
        .get(&format!("/api/users/{}/tracks", listener_id.get()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracks, json!([]));
}
