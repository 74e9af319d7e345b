//! End-to-end tests for the user CRUD surface and its cache behavior.

mod common;

use common::{TestServer, register};
use serde_json::{Value, json};

#[tokio::test]
async fn crud_requires_authentication() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/users", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .post(format!("{}/users", server.base))
        .json(&json!({"name": "X", "email": "x@x.com", "password": "secret1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    server.stop().await;
}

#[tokio::test]
async fn create_and_list_ordered_by_name() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &server.base, "Zed", "zed@x.com", "secret1").await;

    for (name, email) in [("Charlie", "c@x.com"), ("Ann", "a@x.com"), ("Bob", "b@x.com")] {
        let resp = client
            .post(format!("{}/users", server.base))
            .bearer_auth(&token)
            .json(&json!({"name": name, "email": email, "password": "secret1"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);

        let created: Value = resp.json().await.unwrap();
        assert_eq!(created["name"], name);
        assert!(created["id"].as_str().is_some());
        assert!(created["created_at"].as_str().is_some());
        assert!(!created.to_string().contains("password"));
    }

    let resp = client
        .get(format!("{}/users", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let listed: Vec<Value> = resp.json().await.unwrap();
    let names: Vec<&str> = listed.iter().map(|u| u["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Ann", "Bob", "Charlie", "Zed"]);

    server.stop().await;
}

#[tokio::test]
async fn create_with_invalid_body_is_rejected() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &server.base, "Zed", "zed@x.com", "secret1").await;

    let resp = client
        .post(format!("{}/users", server.base))
        .bearer_auth(&token)
        .json(&json!({"name": "", "email": "a@x.com", "password": "secret1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/users", server.base))
        .bearer_auth(&token)
        .json(&json!({"name": "Ann", "email": "zed@x.com", "password": "secret1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    server.stop().await;
}

#[tokio::test]
async fn read_missing_user_not_found() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &server.base, "Zed", "zed@x.com", "secret1").await;

    let resp = client
        .get(format!(
            "{}/users/550e8400-e29b-41d4-a716-446655440000",
            server.base
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["statusCode"], 404);

    // Malformed id is a bad request, not a lookup.
    let resp = client
        .get(format!("{}/users/not-a-uuid", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    server.stop().await;
}

#[tokio::test]
async fn update_is_visible_in_subsequent_reads() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (token, user) = register(&client, &server.base, "Ann", "ann@x.com", "secret1").await;
    let id = user["id"].as_str().unwrap();

    // Warm both cache keys first so this exercises invalidation.
    client
        .get(format!("{}/users", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    client
        .get(format!("{}/users/{id}", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    let resp = client
        .put(format!("{}/users/{id}", server.base))
        .bearer_auth(&token)
        .json(&json!({"name": "Ann Renamed"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["name"], "Ann Renamed");
    assert_eq!(updated["email"], "ann@x.com");

    // find_one reflects the update (no stale read).
    let resp = client
        .get(format!("{}/users/{id}", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["name"], "Ann Renamed");

    // findAll reflects it too.
    let resp = client
        .get(format!("{}/users", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listed: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(listed[0]["name"], "Ann Renamed");

    server.stop().await;
}

#[tokio::test]
async fn update_missing_user_not_found() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &server.base, "Ann", "ann@x.com", "secret1").await;

    let resp = client
        .put(format!(
            "{}/users/550e8400-e29b-41d4-a716-446655440000",
            server.base
        ))
        .bearer_auth(&token)
        .json(&json!({"name": "Ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn delete_returns_no_content_then_not_found() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &server.base, "Zed", "zed@x.com", "secret1").await;

    // Create a second user to delete.
    let resp = client
        .post(format!("{}/users", server.base))
        .bearer_auth(&token)
        .json(&json!({"name": "Ann", "email": "ann@x.com", "password": "secret1"}))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = client
        .delete(format!("{}/users/{id}", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    // The record is gone from reads and from the listing.
    let resp = client
        .get(format!("{}/users/{id}", server.base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Deleting again fails the same way, first and repeated attempts alike.
    for _ in 0..2 {
        let resp = client
            .delete(format!("{}/users/{id}", server.base))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    server.stop().await;
}
