// src/web/test/mod.rs
// Router-level tests: requests go through the real routes, middleware and an
// in-memory session store.
use crate::{
    db::test_pool,
    models::{room::RoomRequest, user::Role},
    services::{room_service, user_service},
    state::AppState,
    web::routes::create_router,
};
use axum::{
    body::Body,
    http::{header, HeaderName, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Days, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

mod reservations;

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<String>,
}

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = test_pool().await;
        let app = create_router(AppState { db_pool: pool.clone() })
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false));
        Self { app, pool }
    }

    pub async fn user(&self, username: &str, role: Role) -> i64 {
        user_service::create_user(&self.pool, username, "secret1", role)
            .await
            .unwrap()
            .id
    }

    pub async fn room(&self, number: &str, standard: &str) -> i64 {
        let req = RoomRequest { number: number.into(), standard: standard.into(), price: 120.0 };
        room_service::create_room(&self.pool, &req).await.unwrap().id
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        match cookie {
            Some(cookie) => self.send_with(method, uri, body, &[(header::COOKIE, cookie)]).await,
            None => self.send_with(method, uri, body, &[]).await,
        }
    }

    pub async fn send_with(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(HeaderName, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body, cookie }
    }

    /// Logs in and returns the session cookie.
    pub async fn login(&self, username: &str) -> String {
        let res = self
            .send(
                Method::POST,
                "/api/auth/login",
                Some(serde_json::json!({ "username": username, "password": "secret1" })),
                None,
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        res.cookie.expect("login sets a session cookie")
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Some(cookie)).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body), Some(cookie)).await
    }

    pub async fn put(&self, uri: &str, body: Value, cookie: &str) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), Some(cookie)).await
    }

    pub async fn delete(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, Some(cookie)).await
    }
}

/// `Authorization` header value for HTTP Basic.
pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", general_purpose::STANDARD.encode(format!("{}:{}", username, password)))
}

/// A date `days` from today, formatted as the API expects.
pub fn future_date(days: u64) -> String {
    (Utc::now().date_naive() + Days::new(days)).to_string()
}
