mod common;

use auth::Claims;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["is_superuser"], false);
    assert!(body["id"].is_number());

    // The stored hash never leaves the server
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_register_without_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "bob",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "bob");
    assert!(body["email"].is_null());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;

    // Create first user
    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "original_pw"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Second registration under the same username must be rejected
    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "other_pw"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Username already registered");

    // The first record is untouched: its password still works, the rejected one does not
    app.login("alice", "original_pw").await;

    let response = app
        .post("/api/auth/token")
        .form(&[("username", "alice"), ("password", "other_pw")])
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_register_invalid_username() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "n",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("too short"));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_register_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "carol",
            "email": "not-an-email",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("Invalid email"));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_login_success() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/api/auth/token")
        .form(&[("username", "alice"), ("password", "pw123")])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Wrong password for an existing account
    let wrong_password = app
        .post("/api/auth/token")
        .form(&[("username", "alice"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.headers()["www-authenticate"], "Bearer");
    let wrong_password_body = wrong_password.text().await.expect("Failed to read body");

    // Account that does not exist
    let unknown_user = app
        .post("/api/auth/token")
        .form(&[("username", "mallory"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.headers()["www-authenticate"], "Bearer");
    let unknown_user_body = unknown_user.text().await.expect("Failed to read body");

    // Username that could never have been registered
    let invalid_username = app
        .post("/api/auth/token")
        .form(&[("username", "no such user!"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(invalid_username.status(), StatusCode::UNAUTHORIZED);
    let invalid_username_body = invalid_username.text().await.expect("Failed to read body");

    // All three failures produce byte-identical responses
    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(wrong_password_body, invalid_username_body);

    let body: serde_json::Value =
        serde_json::from_str(&wrong_password_body).expect("Failed to parse response");
    assert_eq!(body["message"], "Incorrect username or password");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_login_does_not_check_active_flag() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    sqlx::query("UPDATE users SET is_active = FALSE WHERE username = 'alice'")
        .execute(&app.db.pool)
        .await
        .expect("Failed to deactivate user");

    // A deactivated account can still obtain a token
    let token = app.login("alice", "pw123").await;

    // The active check happens where the identity is used
    let response = app
        .get_authenticated("/api/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Inactive user");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_me_returns_current_user() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "pw123"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = app.login("alice", "pw123").await;

    let response = app
        .get_authenticated("/api/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["is_superuser"], false);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_me_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/auth/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["www-authenticate"], "Bearer");

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Could not validate credentials");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_me_with_malformed_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/api/auth/me", "not-a-valid-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Could not validate credentials");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_me_with_tampered_token() {
    let app = TestApp::spawn().await;

    let token = app.register_and_login("alice", "pw123").await;

    // Flip the last character of the signature
    let mut tampered = token;
    let last = if tampered.pop() == Some('A') { 'B' } else { 'A' };
    tampered.push(last);

    let response = app
        .get_authenticated("/api/auth/me", &tampered)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Could not validate credentials");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_me_with_expired_token() {
    let app = TestApp::spawn().await;

    let expired = Claims::for_user("alice", false, 60)
        .with_expiration(chrono::Utc::now().timestamp() - 120);
    let token = app.mint_token(&expired);

    let response = app
        .get_authenticated("/api/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Could not validate credentials");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_me_after_account_deleted() {
    let app = TestApp::spawn().await;

    let token = app.register_and_login("alice", "pw123").await;

    sqlx::query("DELETE FROM users WHERE username = 'alice'")
        .execute(&app.db.pool)
        .await
        .expect("Failed to delete user");

    // The signature still verifies but the subject no longer exists
    let response = app
        .get_authenticated("/api/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Could not validate credentials");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_list_products_public() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/products")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!([]));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_get_product_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/products/999")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Product not found: 999");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_create_product_requires_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/products")
        .json(&json!({
            "id": 1,
            "name": "Laptop",
            "description": "15 inch ultrabook",
            "price": 999.99,
            "quantity": 10
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["www-authenticate"], "Bearer");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_create_product_requires_admin() {
    let app = TestApp::spawn().await;

    let token = app.register_and_login("alice", "pw123").await;

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&json!({
            "id": 1,
            "name": "Laptop",
            "description": "15 inch ultrabook",
            "price": 999.99,
            "quantity": 10
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Admin privileges required");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_admin_promotion_requires_fresh_token() {
    let app = TestApp::spawn().await;

    let product = json!({
        "id": 1,
        "name": "Laptop",
        "description": "15 inch ultrabook",
        "price": 999.99,
        "quantity": 10
    });

    let stale_token = app.register_and_login("alice", "pw123").await;

    // Not an admin yet
    let response = app
        .post_authenticated("/api/products", &stale_token)
        .json(&product)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.promote_to_admin("alice").await;

    // The old token still carries the old role claim
    let response = app
        .post_authenticated("/api/products", &stale_token)
        .json(&product)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A fresh login picks up the new role
    let fresh_token = app.login("alice", "pw123").await;

    let response = app
        .post_authenticated("/api/products", &fresh_token)
        .json(&product)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Laptop");
    assert_eq!(body["price"], 999.99);
    assert_eq!(body["quantity"], 10);

    // Anyone can read it back without a token
    let response = app
        .get("/api/products/1")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Laptop");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_create_product_duplicate_id() {
    let app = TestApp::spawn().await;

    app.register_and_login("admin", "pw123").await;
    app.promote_to_admin("admin").await;
    let token = app.login("admin", "pw123").await;

    let product = json!({
        "id": 5,
        "name": "Keyboard",
        "description": "Mechanical, tenkeyless",
        "price": 89.99,
        "quantity": 40
    });

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&product)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&product)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Product already exists: 5");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_update_product() {
    let app = TestApp::spawn().await;

    app.register_and_login("admin", "pw123").await;
    app.promote_to_admin("admin").await;
    let token = app.login("admin", "pw123").await;

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&json!({
            "id": 1,
            "name": "Laptop",
            "description": "15 inch ultrabook",
            "price": 999.99,
            "quantity": 10
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .put_authenticated("/api/products/1", &token)
        .json(&json!({
            "id": 1,
            "name": "Laptop Pro",
            "description": "16 inch workstation",
            "price": 1499.99,
            "quantity": 3
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Laptop Pro");
    assert_eq!(body["price"], 1499.99);

    // The replacement is visible to public reads
    let response = app
        .get("/api/products/1")
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Laptop Pro");
    assert_eq!(body["quantity"], 3);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_update_product_not_found() {
    let app = TestApp::spawn().await;

    app.register_and_login("admin", "pw123").await;
    app.promote_to_admin("admin").await;
    let token = app.login("admin", "pw123").await;

    let response = app
        .put_authenticated("/api/products/42", &token)
        .json(&json!({
            "id": 42,
            "name": "Ghost",
            "description": "Never stored",
            "price": 1.0,
            "quantity": 1
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Product not found: 42");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_update_product_can_move_id() {
    let app = TestApp::spawn().await;

    app.register_and_login("admin", "pw123").await;
    app.promote_to_admin("admin").await;
    let token = app.login("admin", "pw123").await;

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&json!({
            "id": 1,
            "name": "Monitor",
            "description": "27 inch, 4K",
            "price": 349.99,
            "quantity": 12
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    // The body's id wins over the path's: the row moves to id 2
    let response = app
        .put_authenticated("/api/products/1", &token)
        .json(&json!({
            "id": 2,
            "name": "Monitor",
            "description": "27 inch, 4K",
            "price": 349.99,
            "quantity": 12
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get("/api/products/1")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .get("/api/products/2")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_delete_product() {
    let app = TestApp::spawn().await;

    app.register_and_login("admin", "pw123").await;
    app.promote_to_admin("admin").await;
    let token = app.login("admin", "pw123").await;

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&json!({
            "id": 7,
            "name": "Webcam",
            "description": "1080p, USB-C",
            "price": 59.99,
            "quantity": 30
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .delete_authenticated("/api/products/7", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get("/api/products/7")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_delete_product_not_found() {
    let app = TestApp::spawn().await;

    app.register_and_login("admin", "pw123").await;
    app.promote_to_admin("admin").await;
    let token = app.login("admin", "pw123").await;

    let response = app
        .delete_authenticated("/api/products/99", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Product not found: 99");
}
