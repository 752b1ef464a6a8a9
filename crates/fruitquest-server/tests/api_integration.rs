#[allow(dead_code)]
mod common;

use serde_json::{Value, json};

use fruitquest_server::config::{LimitsConfig, ServerConfig};

use common::TestServer;

async fn post(client: &reqwest::Client, server: &TestServer, body: Value) -> reqwest::Response {
    client
        .post(server.scores_url())
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn first_post_creates_record() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let resp = post(
        &client,
        &server,
        json!({ "score": 4, "user_id": "17", "level_id": 5 }),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["score"], 4);
    assert!(body.get("requirePatch").is_none());
}

#[tokio::test]
async fn repeat_post_asks_for_patch() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let body = json!({ "score": 4, "user_id": "17", "level_id": 5 });

    post(&client, &server, body.clone()).await;
    let resp = post(&client, &server, body).await;
    assert_eq!(resp.status(), 200);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["requirePatch"], true);

    let rows: Vec<Value> = client
        .get(server.scores_url())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn patch_updates_score() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    post(
        &client,
        &server,
        json!({ "score": 1, "user_id": "17", "level_id": 6 }),
    )
    .await;

    let resp = client
        .patch(format!("{}/1", server.scores_url()))
        .json(&json!({ "score": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let rows: Value = client
        .get(server.scores_url())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        rows,
        json!([{ "id": 1, "user_id": "17", "level_id": 6, "score": 9 }])
    );
}

#[tokio::test]
async fn patch_unknown_record_is_404() {
    let server = TestServer::new().await;
    let resp = reqwest::Client::new()
        .patch(format!("{}/77", server.scores_url()))
        .json(&json!({ "score": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "score 77 not found");
}

#[tokio::test]
async fn empty_user_id_is_rejected() {
    let server = TestServer::new().await;
    let resp = post(
        &reqwest::Client::new(),
        &server,
        json!({ "score": 1, "user_id": "", "level_id": 5 }),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn full_store_returns_503() {
    let server = TestServer::from_config(ServerConfig {
        limits: LimitsConfig {
            max_records: 1,
            ..LimitsConfig::default()
        },
        ..ServerConfig::default()
    })
    .await;
    let client = reqwest::Client::new();
    post(
        &client,
        &server,
        json!({ "score": 1, "user_id": "1", "level_id": 5 }),
    )
    .await;
    let resp = post(
        &client,
        &server,
        json!({ "score": 1, "user_id": "2", "level_id": 5 }),
    )
    .await;
    assert_eq!(resp.status(), 503);
}
