//! HTTP transport integration tests.
//!
//! Starts the axum router on an ephemeral port and exercises it with reqwest.

#![cfg(feature = "http")]

use std::sync::Arc;

use blogqa::api::{self, handlers};
use blogqa::config::BootstrapAdmin;
use blogqa::{App, Config};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

async fn start_server() -> String {
    let config = Config {
        bootstrap_admin: Some(BootstrapAdmin {
            name: "Admin".into(),
            email: "admin@example.com".into(),
            password: "password123".into(),
        }),
        ..Config::default()
    };
    let app = App::in_memory(config);
    app.bootstrap().unwrap();
    let router = api::router(Arc::new(handlers::service(app)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn register(client: &Client, base: &str, name: &str) -> String {
    let resp = client
        .post(format!("{base}/auth/register"))
        .json(&json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "password": "password123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["data"]["accessToken"].as_str().unwrap().to_string()
}

async fn login(client: &Client, base: &str, email: &str) -> String {
    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    body["data"]["accessToken"].as_str().unwrap().to_string()
}

async fn ask(client: &Client, base: &str, token: &str, title: &str) -> String {
    let resp = client
        .post(format!("{base}/qa/questions"))
        .bearer_auth(token)
        .json(&json!({ "title": title, "content": "Longer explanation of the question." }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check() {
    let base = start_server().await;
    let resp = Client::new().get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let base = start_server().await;
    let resp = Client::new().get(format!("{base}/nope")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn register_login_and_me() {
    let base = start_server().await;
    let client = Client::new();
    register(&client, &base, "Ada").await;
    let token = login(&client, &base, "ada@example.com").await;

    let resp = client
        .get(format!("{base}/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"].get("passwordHash").is_none());

    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tokens_are_required_and_checked() {
    let base = start_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/qa/questions"))
        .json(&json!({ "title": "No token here", "content": "Should be rejected outright." }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .get(format!("{base}/qa/questions"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);

    // Identity headers other than Authorization are ignored.
    let resp = client
        .get(format!("{base}/auth/me"))
        .header("user-id", "someone")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_owner_cannot_delete() {
    let base = start_server().await;
    let client = Client::new();
    let owner = register(&client, &base, "Owner").await;
    let other = register(&client, &base, "Other").await;
    let question = ask(&client, &base, &owner, "Who can delete this?").await;

    let resp = client
        .delete(format!("{base}/qa/questions/{question}"))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .delete(format!("{base}/qa/questions/{question}"))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/qa/questions/{question}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vote_flow() {
    let base = start_server().await;
    let client = Client::new();
    let owner = register(&client, &base, "Owner").await;
    let alice = register(&client, &base, "Alice").await;
    let bob = register(&client, &base, "Bob").await;
    let question = ask(&client, &base, &owner, "What is a vote worth?").await;

    let cast = |token: String, vote_type: &'static str| {
        let client = client.clone();
        let url = format!("{base}/qa/questions/{question}/vote");
        async move {
            let resp = client
                .post(url)
                .bearer_auth(token)
                .json(&json!({ "voteType": vote_type }))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            resp.json::<Value>().await.unwrap()
        }
    };

    let body = cast(alice.clone(), "UPVOTE").await;
    assert_eq!(body["message"], "vote cast");
    assert_eq!(body["data"]["upvoteCount"], 1);

    let body = cast(alice.clone(), "UPVOTE").await;
    assert_eq!(body["message"], "vote removed");
    assert_eq!(body["data"]["upvoteCount"], 0);

    let body = cast(alice.clone(), "DOWNVOTE").await;
    assert_eq!(body["data"]["downvoteCount"], 1);

    let body = cast(bob, "UPVOTE").await;
    assert_eq!(body["data"]["upvoteCount"], 1);
    assert_eq!(body["data"]["downvoteCount"], 1);
    assert_eq!(body["data"]["netVotes"], 0);

    let resp = client
        .get(format!("{base}/qa/questions/{question}/vote-status"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["userVote"], "DOWNVOTE");

    let resp = client
        .post(format!("{base}/qa/questions/{question}/vote"))
        .bearer_auth(&alice)
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_paginated() {
    let base = start_server().await;
    let client = Client::new();
    let owner = register(&client, &base, "Owner").await;
    for i in 0..5 {
        ask(&client, &base, &owner, &format!("Paged question {i}")).await;
    }

    let resp = client
        .get(format!("{base}/qa/questions?page=3&limit=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["currentPage"], 3);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["totalItems"], 5);

    let resp = client
        .get(format!("{base}/qa/questions?limit=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_need_the_admin_role() {
    let base = start_server().await;
    let client = Client::new();
    let user = register(&client, &base, "Plain").await;
    let admin = login(&client, &base, "admin@example.com").await;

    let resp = client
        .get(format!("{base}/admin/stats"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{base}/admin/stats"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["totalUsers"], 2);
}
