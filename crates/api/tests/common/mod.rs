//! Shared helpers for HTTP-level integration tests.
//!
//! Each test gets a private in-memory database with migrations applied and
//! a tenant with one user. Requests are sent straight to the router with
//! `tower::ServiceExt::oneshot`, no TCP listener involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use gestora_api::auth::jwt::{generate_access_token, JwtConfig, TokenSubject};
use gestora_api::config::ServerConfig;
use gestora_api::router::build_app_router;
use gestora_api::state::AppState;
use gestora_core::roles::{ROLE_ADMIN, ROLE_USER};
use gestora_core::tenancy::TENANT_HEADER;
use gestora_core::types::DbId;
use gestora_db::models::user::CreateUser;
use gestora_db::repositories::{TenantRepo, UserRepo};
use gestora_db::DbPool;

/// Test configuration with a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
        },
        bootstrap: None,
    }
}

/// Build the full application router over `pool`, with the production
/// middleware stack.
pub fn build_test_app(pool: DbPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub async fn memory_pool() -> DbPool {
    gestora_db::create_memory_pool()
        .await
        .expect("in-memory database should open")
}

/// A signed-in user of one tenant.
#[derive(Clone)]
pub struct TestUser {
    pub pool: DbPool,
    pub tenant: String,
    pub tenant_id: DbId,
    pub user_id: DbId,
    pub token: String,
}

impl TestUser {
    /// A fresh database with tenant `acme` and an admin user.
    pub async fn admin() -> Self {
        let pool = memory_pool().await;
        Self::create(pool, "acme", ROLE_ADMIN).await
    }

    /// Another tenant with its own admin, on the same database.
    pub async fn other_tenant(&self, slug: &str) -> Self {
        Self::create(self.pool.clone(), slug, ROLE_ADMIN).await
    }

    /// A plain (non-admin) user of the same tenant.
    pub async fn colleague(&self, email: &str) -> Self {
        let user = insert_user(&self.pool, self.tenant_id, email, ROLE_USER).await;
        Self {
            pool: self.pool.clone(),
            tenant: self.tenant.clone(),
            tenant_id: self.tenant_id,
            user_id: user,
            token: mint_token(user, self.tenant_id, &self.tenant, ROLE_USER),
        }
    }

    async fn create(pool: DbPool, slug: &str, role: &str) -> Self {
        let tenant = TenantRepo::create(&pool, slug, &format!("Tenant {slug}"))
            .await
            .expect("tenant insert should succeed");
        let user_id = insert_user(&pool, tenant.id, &format!("admin@{slug}.test"), role).await;
        Self {
            token: mint_token(user_id, tenant.id, &tenant.slug, role),
            pool,
            tenant: tenant.slug,
            tenant_id: tenant.id,
            user_id,
        }
    }

    pub fn app(&self) -> Router {
        build_test_app(self.pool.clone())
    }

    /// Send an authenticated request carrying this user's tenant header.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        send(
            self.app(),
            method,
            uri,
            Some(&self.token),
            Some(&self.tenant),
            body,
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(Method::DELETE, uri, None).await
    }

    /// POST and return the `data` of a 201 response.
    pub async fn create_ok(&self, uri: &str, body: serde_json::Value) -> serde_json::Value {
        let response = self.post(uri, body).await;
        let status = response.status();
        let json = body_json(response).await;
        assert_eq!(status, axum::http::StatusCode::CREATED, "POST {uri}: {json}");
        json["data"].clone()
    }
}

/// Insert a user with a placeholder hash; tests that log in hash a real
/// password themselves.
async fn insert_user(pool: &DbPool, tenant_id: DbId, email: &str, role: &str) -> DbId {
    let input = CreateUser {
        email: email.to_string(),
        display_name: "Test User".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role: role.to_string(),
    };
    UserRepo::create(pool, tenant_id, &input)
        .await
        .expect("user insert should succeed")
        .id
}

pub fn mint_token(user_id: DbId, tenant_id: DbId, tenant: &str, role: &str) -> String {
    let subject = TokenSubject {
        user_id,
        tenant_id,
        tenant,
        role,
    };
    generate_access_token(subject, &test_config().jwt).expect("token should sign")
}

/// Send a request with optional Bearer token, tenant header and JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    tenant: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    if let Some(tenant) = tenant {
        builder = builder.header(TENANT_HEADER, tenant);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
