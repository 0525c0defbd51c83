//! End-to-end tests for the storefront API.
//!
//! These tests require:
//! - A disposable `PostgreSQL` database in `TEST_DATABASE_URL`
//!
//! Run with: cargo test -p pantry-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pantry_integration_tests::{TestServer, unique_username};
use pantry_storefront::db;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

/// Larger than any id the tests will create.
const MISSING_PRODUCT_ID: i32 = i32::MAX;

async fn cart(server: &TestServer, client: &Client) -> (StatusCode, Value) {
    let response = client.get(server.url("/cart")).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn add_to_cart(
    server: &TestServer,
    client: &Client,
    product_id: i64,
    quantity: Option<i64>,
) -> (StatusCode, Value) {
    let mut request = client.post(server.url(&format!("/add_to_cart/{product_id}")));
    if let Some(quantity) = quantity {
        request = request.json(&json!({ "quantity": quantity }));
    }
    let response = request.send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

// ============================================================================
// Credentials & Sessions
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_register_duplicate_username_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();
    let username = unique_username("alice");

    let response = client
        .post(server.url("/register"))
        .json(&json!({ "username": username, "password": "pw1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], username.as_str());
    assert!(body["user"]["id"].is_i64());
    assert!(body["user"].get("password_hash").is_none());

    let response = client
        .post(server.url("/register"))
        .json(&json!({ "username": username, "password": "pw2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Username already exists");

    // The first password still works, the second never took effect
    assert!(server.login(&client, &username, "pw1").await.is_ok());
    assert!(server.login(&client, &username, "pw2").await.is_err());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_usernames_are_case_sensitive() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();
    let username = unique_username("carol");

    server.register(&client, &username, "pw1").await.unwrap();
    server
        .register(&client, &username.to_uppercase(), "pw1")
        .await
        .unwrap();

    assert!(
        server
            .login(&client, &username.to_uppercase(), "pw1")
            .await
            .is_ok()
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_password_is_stored_hashed() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();
    let username = unique_username("hash");

    server.register(&client, &username, "pw1").await.unwrap();

    let (hash,): (String,) =
        sqlx::query_as("SELECT password_hash FROM pantry.user WHERE username = $1")
            .bind(&username)
            .fetch_one(&server.pool)
            .await
            .unwrap();
    assert_ne!(hash, "pw1");
    assert!(hash.starts_with("$argon2id$"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_login_failures_are_indistinguishable() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();
    let username = unique_username("dave");
    server.register(&client, &username, "pw1").await.unwrap();

    let mut bodies = Vec::new();
    for (name, password) in [
        (username.as_str(), "wrong"),
        ("nobody-by-this-name", "pw1"),
    ] {
        let response = client
            .post(server.url("/login"))
            .json(&json!({ "username": name, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(response.json::<Value>().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);

    // No session was started
    let (status, _) = cart(&server, &client).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_current_user_reflects_session() {
    let server = TestServer::start().await.unwrap();
    let (client, username) = server.signed_in_client().await.unwrap();

    let response = client.get(server.url("/current_user")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], username.as_str());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_logout_ends_session() {
    let server = TestServer::start().await.unwrap();
    let (client, _) = server.signed_in_client().await.unwrap();

    let response = client.post(server.url("/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = cart(&server, &client).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");

    let response = client.post(server.url("/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_replayed_cookie_after_logout_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let username = unique_username("erin");

    // Manage the cookie by hand so it can be replayed after logout
    let client = Client::new();
    client
        .post(server.url("/register"))
        .json(&json!({ "username": username, "password": "pw1" }))
        .send()
        .await
        .unwrap();
    let response = client
        .post(server.url("/login"))
        .json(&json!({ "username": username, "password": "pw1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let response = client
        .get(server.url("/cart"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(server.url("/logout"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(server.url("/cart"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_add_and_get_product() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();

    let response = client
        .post(server.url("/add_product"))
        .json(&json!({ "name": "Widget", "price": 9.99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Product added successfully");
    assert_eq!(body["product"]["name"], "Widget");
    assert_eq!(body["product"]["price"], 9.99);
    let id = body["product"]["id"].as_i64().unwrap();

    let response = client
        .get(server.url(&format!("/product/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "id": id, "name": "Widget", "price": 9.99 }));

    let products: Vec<Value> = client
        .get(server.url("/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(products.iter().any(|p| p["id"] == id));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_get_missing_product_is_not_found() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();

    let response = client
        .get(server.url(&format!("/product/{MISSING_PRODUCT_ID}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_duplicate_product_names_are_allowed() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();

    let first = server.add_product(&client, "Twin", 1.0).await.unwrap();
    let second = server.add_product(&client, "Twin", 2.0).await.unwrap();
    assert_ne!(first, second);
}

// ============================================================================
// Cart Ledger
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_add_missing_product_leaves_cart_empty() {
    let server = TestServer::start().await.unwrap();
    let (client, _) = server.signed_in_client().await.unwrap();

    let (status, body) = add_to_cart(&server, &client, MISSING_PRODUCT_ID.into(), Some(2)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    let (status, body) = cart(&server, &client).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_repeated_adds_merge_into_one_line() {
    let server = TestServer::start().await.unwrap();
    let (client, _) = server.signed_in_client().await.unwrap();
    let product_id = server.add_product(&client, "Widget", 9.99).await.unwrap();

    let (status, body) = add_to_cart(&server, &client, product_id, Some(1)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product added to cart");
    assert_eq!(body["cartItem"], json!({ "product_id": product_id, "quantity": 1 }));

    let (status, body) = add_to_cart(&server, &client, product_id, Some(3)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cartItem"]["quantity"], 4);

    let (status, lines) = cart(&server, &client).await;
    assert_eq!(status, StatusCode::OK);
    let lines = lines.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["product_id"], product_id);
    assert_eq!(lines[0]["quantity"], 4);
    assert_eq!(lines[0]["name"], "Widget");
    assert_eq!(lines[0]["price"], 9.99);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_add_without_body_adds_one() {
    let server = TestServer::start().await.unwrap();
    let (client, _) = server.signed_in_client().await.unwrap();
    let product_id = server.add_product(&client, "Gadget", 24.5).await.unwrap();

    let (status, body) = add_to_cart(&server, &client, product_id, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cartItem"]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_non_positive_quantity_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let (client, _) = server.signed_in_client().await.unwrap();
    let product_id = server.add_product(&client, "Sprocket", 3.75).await.unwrap();

    for quantity in [0, -5] {
        let (status, body) = add_to_cart(&server, &client, product_id, Some(quantity)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "quantity {quantity}");
        assert!(body["error"].is_string());
    }

    let (_, lines) = cart(&server, &client).await;
    assert_eq!(lines, json!([]));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_merge_overflow_keeps_existing_quantity() {
    let server = TestServer::start().await.unwrap();
    let (client, _) = server.signed_in_client().await.unwrap();
    let product_id = server.add_product(&client, "Gizmo", 129.0).await.unwrap();

    let (status, _) = add_to_cart(&server, &client, product_id, Some(i64::from(i32::MAX))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = add_to_cart(&server, &client, product_id, Some(1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, lines) = cart(&server, &client).await;
    assert_eq!(lines[0]["quantity"], i32::MAX);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_concurrent_adds_are_not_lost() {
    const ADDS: i64 = 20;

    let server = TestServer::start().await.unwrap();
    let (client, _) = server.signed_in_client().await.unwrap();
    let product_id = server.add_product(&client, "Doohickey", 0.99).await.unwrap();

    let url = server.url(&format!("/add_to_cart/{product_id}"));
    let requests = (0..ADDS).map(|_| {
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "quantity": 1 }))
                .send()
                .await
                .unwrap()
                .status()
        })
    });

    for handle in requests.collect::<Vec<_>>() {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let (_, lines) = cart(&server, &client).await;
    let lines = lines.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], ADDS);
}

// ============================================================================
// Access Guard
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_carts_are_isolated_between_users() {
    let server = TestServer::start().await.unwrap();
    let (alice, _) = server.signed_in_client().await.unwrap();
    let (bob, _) = server.signed_in_client().await.unwrap();
    let product_id = server.add_product(&alice, "Widget", 9.99).await.unwrap();

    let (status, _) = add_to_cart(&server, &alice, product_id, Some(2)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, bob_lines) = cart(&server, &bob).await;
    assert_eq!(bob_lines, json!([]));

    // Bob's add creates his own line and leaves Alice's untouched
    let (status, body) = add_to_cart(&server, &bob, product_id, Some(5)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cartItem"]["quantity"], 5);

    let (_, alice_lines) = cart(&server, &alice).await;
    assert_eq!(alice_lines[0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_anonymous_add_to_cart_writes_nothing() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();
    let product_id = server.add_product(&client, "Widget", 9.99).await.unwrap();

    let (status, _) = add_to_cart(&server, &client, product_id, Some(1)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM pantry.cart_item WHERE product_id = $1")
            .bind(i32::try_from(product_id).unwrap())
            .fetch_one(&server.pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_readiness_checks_database() {
    let server = TestServer::start().await.unwrap();
    let client = server.client().unwrap();

    let response = client.get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_migrations_can_be_rerun() {
    let server = TestServer::start().await.unwrap();

    // `start` already migrated; repeated runs must be no-ops for any role name
    db::MIGRATOR.run(&server.pool).await.unwrap();
    db::MIGRATOR.run(&server.pool).await.unwrap();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM public._sqlx_migrations")
        .fetch_one(&server.pool)
        .await
        .unwrap();
    assert_eq!(applied, i64::try_from(db::MIGRATOR.iter().count()).unwrap());
}
