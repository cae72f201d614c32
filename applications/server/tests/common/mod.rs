//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use cadence_core::{CatalogStore, CreateUser, Role, UserId};
use cadence_server::{
    api,
    services::{AuthService, FileStorage},
    state::AppState,
};
use cadence_storage::Database;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_PASSWORD: &str = "TestPassword123!";
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// Router plus the handles tests need to seed data
pub struct TestApp {
    pub router: Router,
    pub auth_service: Arc<AuthService>,
    pub db: Arc<Database>,
    pub media_dir: std::path::PathBuf,
    _temp_dir: TempDir,
}

/// Create a test database with migrations applied, on a real temp file
pub async fn create_test_database(temp_dir: &TempDir) -> Arc<Database> {
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
    let pool = cadence_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    cadence_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Arc::new(Database::new(pool))
}

/// Helper to create test app router
pub async fn create_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_database(&temp_dir).await;

    let media_dir = temp_dir.path().join("media");
    let file_storage = FileStorage::new(media_dir.clone(), "/media", MAX_UPLOAD_BYTES);
    file_storage.initialize().await.unwrap();

    let auth_service = Arc::new(AuthService::new(
        "test-secret-key".to_string(),
        1, // 1 hour access
        1, // 1 day refresh
    ));

    let app_state = AppState::new(
        Arc::clone(&db),
        Arc::clone(&auth_service),
        Arc::new(file_storage),
        MAX_UPLOAD_BYTES,
    );

    TestApp {
        router: api::router(app_state),
        auth_service,
        db,
        media_dir,
        _temp_dir: temp_dir,
    }
}

impl TestApp {
    /// Create a user with `TEST_PASSWORD` and return its id and an access token
    pub async fn user_with_role(&self, username: &str, role: Role) -> (UserId, String) {
        let password_hash = self.auth_service.hash_password(TEST_PASSWORD).unwrap();
        let user = self
            .db
            .create_user(CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                role,
                password_hash,
            })
            .await
            .unwrap();

        let token = self.auth_service.create_access_token(user.id).unwrap();
        (user.id, token)
    }

    pub async fn listener(&self, username: &str) -> (UserId, String) {
        self.user_with_role(username, Role::Listener).await
    }

    pub async fn artist(&self, username: &str) -> (UserId, String) {
        self.user_with_role(username, Role::Artist).await
    }

    /// Send a request and decode the JSON body (`Null` when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if body_bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send(request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.send(request(Method::DELETE, uri, token, None)).await
    }

    /// Create a track owned by the token's user and return its id
    pub async fn create_track(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/tracks",
                Some(token),
                serde_json::json!({
                    "title": title,
                    "duration": 200,
                    "media_url": format!("https://media.example.com/{title}.mp3"),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create track failed: {body}");
        body["id"].as_i64().unwrap()
    }

    /// Create a playlist and return its id
    pub async fn create_playlist(&self, token: &str, title: &str, privacy: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/playlists",
                Some(token),
                serde_json::json!({ "title": title, "privacy": privacy }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create playlist failed: {body}");
        body["id"].as_i64().unwrap()
    }
}

/// Build a request with an optional bearer token and JSON body
pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Build a `multipart/form-data` request carrying one file field
pub fn multipart_request(
    uri: &str,
    token: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let boundary = "cadence-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}
