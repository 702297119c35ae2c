#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use item_service::{
    db, extractors::USER_ID_HEADER, routes::routes::app, services::item_service::ItemService,
};
use serde_json::Value;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub db: Arc<SqlitePool>,
}

/// Router over a fresh, migrated in-memory database.
///
/// The pool holds a single connection that never expires, since every
/// SQLite `:memory:` connection is its own database.
pub async fn spawn_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::run_migrations(&pool).await.expect("migrations");

    let db = Arc::new(pool);
    let router = app(ItemService::new(db.clone()));
    TestApp { router, db }
}

impl TestApp {
    pub async fn seed_user(&self, username: &str, location: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, username, name, surname, company, location, email, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind("Ana")
        .bind("Kovac")
        .bind(Some("Acme"))
        .bind(location)
        .bind(format!("{}@example.com", username))
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&*self.db)
        .await
        .expect("seed user");
        id
    }

    pub async fn seed_category(&self, name: &str, parent: Option<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO categories (id, name, parent_id) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(parent)
            .execute(&*self.db)
            .await
            .expect("seed category");
        id
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    pub async fn create_item(
        &self,
        user: Uuid,
        category: Uuid,
        subcategory: Uuid,
        body: Value,
    ) -> (StatusCode, Value) {
        let uri = format!(
            "/items?categoryId={}&subcategoryId={}",
            category, subcategory
        );
        self.send(post_json(&uri, Some(user), &body)).await
    }

    pub async fn fetch_public(&self, item_id: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(format!("/public/items/{}", item_id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
    }

    pub async fn delete(&self, user: Uuid, item_id: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/items/{}", item_id))
                .header(USER_ID_HEADER, user.to_string())
                .body(Body::empty())
                .expect("request"),
        )
        .await
    }
}

pub fn post_json(uri: &str, user: Option<Uuid>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user.to_string());
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn photo() -> Value {
    serde_json::json!({
        "url": "https://cdn.example.com/chair.jpg",
        "fileName": "chair.jpg",
        "originalname": "IMG-0834.jpg",
        "mimetype": "image/jpeg",
        "thumbnail": {
            "url": "https://cdn.example.com/thumbnail_chair.jpg",
            "fileName": "thumbnail_chair.jpg",
            "originalname": "thumbnail_IMG-0834.jpg",
            "mimetype": "image/jpeg"
        }
    })
}

pub fn chair() -> Value {
    serde_json::json!({
        "title": "Chair",
        "condition": "used",
        "description": "Wooden chair",
        "photos": [photo()]
    })
}

/// A seeded owner plus a category and one of its subcategories.
pub struct Fixture {
    pub user: Uuid,
    pub category: Uuid,
    pub subcategory: Uuid,
}

pub async fn fixture(app: &TestApp) -> Fixture {
    let user = app.seed_user("ana", Some("Novi Sad")).await;
    let category = app.seed_category("Furniture", None).await;
    let subcategory = app.seed_category("Chairs", Some(category)).await;
    Fixture {
        user,
        category,
        subcategory,
    }
}
