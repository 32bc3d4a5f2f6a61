use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;
use tower::ServiceExt;

use catalog_api::config::AppConfig;
use catalog_api::db::{establish_connection_from_app_config, run_migrations};
use catalog_api::{build_router, AppState};

/// A fully wired application over a throwaway SQLite file.
pub struct TestApp {
    pub router: Router,
    pub db: Arc<DatabaseConnection>,
    // Held so the database file outlives the test.
    _tempdir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let db_path = tempdir.path().join("catalog.db");
        let database_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let config = AppConfig::for_tests(database_url);
        let db = Arc::new(
            establish_connection_from_app_config(&config)
                .await
                .expect("connect"),
        );
        run_migrations(&db).await.expect("migrations");
        let router = build_router(AppState::new(db.clone(), config));
        Self {
            router,
            db,
            _tempdir: tempdir,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).expect("request")
            }
            None => builder.body(Body::empty()).expect("request"),
        };
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request("DELETE", uri, None).await
    }

    /// Creates a product and returns its id.
    pub async fn create_product(
        &self,
        name: &str,
        category: &str,
        price: i64,
        quantity: i64,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/products",
                serde_json::json!({
                    "name": name,
                    "category": category,
                    "price": price,
                    "quantity": quantity,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body.as_i64().expect("bare integer id")
    }
}
