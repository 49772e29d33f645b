//! Login, refresh, logout, tenant resolution and user administration.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, send, TestUser};
use gestora_api::auth::password::hash_password;
use gestora_db::models::user::CreateUser;
use gestora_db::repositories::UserRepo;
use serde_json::json;

const PASSWORD: &str = "correct-horse-battery";

/// Give the tenant a user with a real Argon2 hash so it can log in.
async fn user_with_password(ctx: &TestUser, email: &str) {
    let input = CreateUser {
        email: email.to_string(),
        display_name: "Login User".to_string(),
        password_hash: hash_password(PASSWORD).unwrap(),
        role: "user".to_string(),
    };
    UserRepo::create(&ctx.pool, ctx.tenant_id, &input).await.unwrap();
}

async fn login(ctx: &TestUser, email: &str, password: &str) -> axum::http::Response<axum::body::Body> {
    send(
        ctx.app(),
        Method::POST,
        "/api/v1/auth/login",
        None,
        None,
        Some(json!({"tenant": ctx.tenant, "email": email, "password": password})),
    )
    .await
}

#[tokio::test]
async fn login_refresh_and_logout() {
    let ctx = TestUser::admin().await;
    user_with_password(&ctx, "ana@acme.test").await;

    let response = login(&ctx, "ANA@acme.test", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = body_json(response).await;
    assert_eq!(session["user"]["email"], "ana@acme.test");
    assert_eq!(session["user"]["role"], "user");
    assert_eq!(session["tenant"]["slug"], "acme");
    let access = session["access_token"].as_str().unwrap().to_string();
    let refresh = session["refresh_token"].as_str().unwrap().to_string();

    // The access token works against a tenant route.
    let response = send(
        ctx.app(),
        Method::GET,
        "/api/v1/preparation-zones",
        Some(&access),
        Some("acme"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Refresh rotates: the new token works once, the old one is revoked.
    let refresh_body = json!({"refresh_token": refresh});
    let response = send(
        ctx.app(),
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        None,
        Some(refresh_body.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], refresh_body["refresh_token"]);

    let response = send(
        ctx.app(),
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        None,
        Some(refresh_body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logout revokes every remaining session.
    let new_access = rotated["access_token"].as_str().unwrap();
    let response = send(
        ctx.app(),
        Method::POST,
        "/api/v1/auth/logout",
        Some(new_access),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        ctx.app(),
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        None,
        Some(json!({"refresh_token": rotated["refresh_token"]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let ctx = TestUser::admin().await;
    user_with_password(&ctx, "ana@acme.test").await;

    let response = login(&ctx, "ana@acme.test", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let ctx = TestUser::admin().await;
    user_with_password(&ctx, "ana@acme.test").await;
    user_with_password(&ctx, "luis@acme.test").await;

    for _ in 0..5 {
        let response = login(&ctx, "ana@acme.test", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while the lock lasts.
    let response = login(&ctx, "ana@acme.test", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");

    let user = UserRepo::find_by_email(&ctx.pool, ctx.tenant_id, "ana@acme.test")
        .await
        .unwrap()
        .unwrap();
    let locked_until = user.locked_until.expect("account should be locked");
    let remaining = locked_until - chrono::Utc::now();
    assert!(remaining > chrono::Duration::minutes(14));
    assert!(remaining <= chrono::Duration::minutes(15));

    // The lock is per account.
    let response = login(&ctx, "luis@acme.test", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_to_unknown_tenant_is_unauthorized() {
    let ctx = TestUser::admin().await;
    let response = send(
        ctx.app(),
        Method::POST,
        "/api/v1/auth/login",
        None,
        None,
        Some(json!({"tenant": "nobody", "email": "a@b.test", "password": PASSWORD})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Tenant resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let ctx = TestUser::admin().await;
    let response = send(
        ctx.app(),
        Method::GET,
        "/api/v1/preparation-zones",
        None,
        Some("acme"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_tenant_header_is_bad_request() {
    let ctx = TestUser::admin().await;
    let response = send(
        ctx.app(),
        Method::GET,
        "/api/v1/preparation-zones",
        Some(&ctx.token),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tenant_header_must_match_token() {
    let ctx = TestUser::admin().await;
    let other = ctx.other_tenant("globex").await;

    let response = send(
        ctx.app(),
        Method::GET,
        "/api/v1/preparation-zones",
        Some(&ctx.token),
        Some(&other.tenant),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rows_of_another_tenant_are_not_found() {
    let ctx = TestUser::admin().await;
    let other = ctx.other_tenant("globex").await;

    let zone = other
        .create_ok(
            "/api/v1/preparation-zones",
            json!({"code": "BAR", "name": "Bar"}),
        )
        .await;
    let id = zone["id"].as_i64().unwrap();

    let response = ctx.get(&format!("/api/v1/preparation-zones/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = ctx.delete(&format!("/api/v1/preparation-zones/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The same code is free in this tenant.
    ctx.create_ok(
        "/api/v1/preparation-zones",
        json!({"code": "BAR", "name": "Bar"}),
    )
    .await;
}

// ---------------------------------------------------------------------------
// User administration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_admin_requires_admin_role() {
    let ctx = TestUser::admin().await;
    let plain = ctx.colleague("plain@acme.test").await;

    let response = plain.get("/api/v1/users").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx.get("/api/v1/users").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 2);
}

#[tokio::test]
async fn create_user_rejects_short_password() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/users",
            json!({"email": "new@acme.test", "display_name": "New", "password": "short"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_cannot_deactivate_themselves() {
    let ctx = TestUser::admin().await;
    let response = ctx.delete(&format!("/api/v1/users/{}", ctx.user_id)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
