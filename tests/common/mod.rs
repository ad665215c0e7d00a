use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt;

use bistro_api::{
    auth::hash_password,
    config::AppConfig,
    db,
    entities::staff,
    AppState,
};

/// Test harness: the full application router backed by an in-memory SQLite
/// database, one per test.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:",
            "test_secret_key_for_testing_purposes_only!",
            3600,
            "127.0.0.1",
            0,
            "test",
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = bistro_api::app_router(state.clone());
        Self { router, state }
    }

    /// Insert a staff account directly and return it with a fresh token.
    pub async fn seed_staff(&self, username: &str, role: &str) -> (staff::Model, String) {
        let account = staff::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set(hash_password("password123").expect("hashing failed")),
            role: Set(role.to_string()),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("failed to seed staff account");

        let token = self
            .state
            .auth
            .generate_token(&account)
            .expect("failed to issue token")
            .access_token;
        (account, token)
    }

    pub async fn admin_token(&self) -> String {
        self.seed_staff("admin", "admin").await.1
    }

    /// Send a request and return status plus parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is not valid JSON")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Restaurant, branch and table created through the API. Returns their ids.
    pub async fn seed_front_of_house(&self, token: &str) -> (i64, i64, i64) {
        let (status, restaurant) = self
            .post(
                "/restaurants",
                Some(token),
                json!({
                    "name": "Trattoria Uno",
                    "location": "Old Town",
                    "contact_number": "555-0100"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "restaurant: {restaurant}");
        let restaurant_id = restaurant["id"].as_i64().unwrap();

        let (status, branch) = self
            .post(
                "/branches",
                Some(token),
                json!({
                    "address": "1 Main St",
                    "city": "Springfield",
                    "restaurant_id": restaurant_id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "branch: {branch}");
        let branch_id = branch["id"].as_i64().unwrap();

        let (status, table) = self
            .post(
                "/tables",
                Some(token),
                json!({
                    "table_number": "T1",
                    "seats": 4,
                    "branch_id": branch_id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "table: {table}");
        let table_id = table["id"].as_i64().unwrap();

        (restaurant_id, branch_id, table_id)
    }

    /// Menu, category and item created through the API. Returns their ids.
    pub async fn seed_menu_item(&self, token: &str, restaurant_id: i64) -> (i64, i64, i64) {
        let (status, menu) = self
            .post(
                "/menus",
                Some(token),
                json!({
                    "name": "Dinner",
                    "price": "30.00",
                    "restaurant_id": restaurant_id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "menu: {menu}");
        let menu_id = menu["id"].as_i64().unwrap();

        let (status, category) = self
            .post(
                "/categories",
                Some(token),
                json!({ "name": "Mains", "menu_id": menu_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "category: {category}");
        let category_id = category["id"].as_i64().unwrap();

        let (status, item) = self
            .post(
                &format!("/categories/{category_id}/items"),
                Some(token),
                json!({ "name": "Risotto", "price": "12.50" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "item: {item}");
        let item_id = item["id"].as_i64().unwrap();

        (menu_id, category_id, item_id)
    }
}
