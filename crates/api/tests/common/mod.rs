//! Shared helpers for the router tests.
//!
//! Each test builds the full router over its own migrated in-memory SQLite
//! database seeded with one organization and three employees.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use tenderbid_api::{AppState, create_router};
use tenderbid_db::entities::{employee, organization};
use tenderbid_db::migration::Migrator;
use tenderbid_db::{EmployeeRepository, NewEmployee, NewOrganization, OrganizationRepository};
use tenderbid_shared::DatabaseConfig;

/// Router plus the seeded rows.
///
/// `owner` is responsible for `org`, `bidder` and `outsider` are not.
pub struct TestApp {
    pub router: Router,
    pub org: organization::Model,
    pub owner: employee::Model,
    pub bidder: employee::Model,
    pub outsider: employee::Model,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        };
        let db = tenderbid_db::connect(&config).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let employees = EmployeeRepository::new(db.clone());
        let owner = register(&employees, "owner").await;
        let bidder = register(&employees, "bidder").await;
        let outsider = register(&employees, "outsider").await;

        let organizations = OrganizationRepository::new(db.clone());
        let org = organizations
            .create(NewOrganization {
                name: "Bridges JSC".to_string(),
                description: None,
                kind: None,
            })
            .await
            .unwrap();
        organizations.add_responsible(org.id, owner.id).await.unwrap();

        Self {
            router: create_router(AppState::new(db)),
            org,
            owner,
            bidder,
            outsider,
        }
    }

    /// Sends a request and returns the status with the parsed body.
    ///
    /// Non-JSON bodies come back as a JSON string.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(json) => self.send_raw(method, uri, &json.to_string()).await,
            None => {
                let request = Request::builder().method(method).uri(uri).body(Body::empty());
                self.dispatch(request.unwrap()).await
            }
        }
    }

    /// Sends `body` verbatim as `application/json`.
    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn put(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, None).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Creates a tender through the API and returns its ID.
    pub async fn create_tender(&self, name: &str, service_type: &str) -> String {
        let (status, body) = self
            .post(
                "/api/tenders/new",
                serde_json::json!({
                    "name": name,
                    "description": format!("{name} description"),
                    "serviceType": service_type,
                    "organizationId": self.org.id,
                    "creatorUsername": "owner"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Places a bid by `bidder` through the API and returns its ID.
    pub async fn create_bid(&self, tender_id: &str, name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/bids/new",
                serde_json::json!({
                    "name": name,
                    "description": format!("{name} description"),
                    "tenderId": tender_id,
                    "authorType": "User",
                    "authorId": self.bidder.id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

async fn register(repo: &EmployeeRepository, username: &str) -> employee::Model {
    repo.create(NewEmployee {
        username: username.to_string(),
        first_name: None,
        last_name: None,
    })
    .await
    .unwrap()
}
