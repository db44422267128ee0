//! End-to-end tests: real proxy, mock generation API and goal store over TCP.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

use mindful_chat_proxy::goals::GoalLookupPolicy;

mod common;
use common::{candidate, config_for, start_mock_server, start_proxy, Recorder};

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "authorization, x-client-info, apikey, content-type"
    );
}

#[tokio::test]
async fn test_personalized_round_trip() {
    let upstream = Recorder::default();
    let store = Recorder::default();
    let upstream_addr = start_mock_server(upstream.clone(), StatusCode::OK, candidate("I hear you...")).await;
    let store_addr = start_mock_server(
        store.clone(),
        StatusCode::OK,
        json!([{ "mental_health_goals": { "name": "Feel calm", "description": "reduce anxiety" } }]),
    )
    .await;

    let (proxy, shutdown, _updates) = start_proxy(config_for(upstream_addr, store_addr)).await;

    let res = client()
        .post(format!("http://{}/chat", proxy))
        .json(&json!({ "message": "I'm feeling anxious", "userId": "u1" }))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_cors(&res);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "response": "I hear you..." }));

    // Goal store saw one filtered join query with the service credential.
    assert_eq!(store.hits(), 1);
    let query = store.last().unwrap();
    assert_eq!(query.path, "/rest/v1/user_goals");
    let qs = query.query.unwrap();
    assert!(qs.contains("user_id=eq.u1"), "query: {}", qs);
    assert!(qs.contains("select=mental_health_goals"), "query: {}", qs);
    assert_eq!(query.headers["apikey"], "test-service-key");
    assert_eq!(query.headers["authorization"], "Bearer test-service-key");

    // Generation API saw one request with the fixed config and the goal bullet.
    assert_eq!(upstream.hits(), 1);
    let call = upstream.last().unwrap();
    assert_eq!(call.path, "/v1beta/models/gemini-2.0-flash:generateContent");
    assert_eq!(call.headers["x-goog-api-key"], "test-api-key");
    let sent = call.json();
    assert_eq!(sent["generationConfig"]["topK"], 40);
    assert_eq!(sent["generationConfig"]["maxOutputTokens"], 1024);
    assert_eq!(sent["safetySettings"].as_array().unwrap().len(), 4);
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("- Feel calm: reduce anxiety"));
    assert!(prompt.ends_with("User message: I'm feeling anxious"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_upstream_without_user() {
    let upstream = Recorder::default();
    let store = Recorder::default();
    let upstream_addr = start_mock_server(upstream.clone(), StatusCode::OK, json!({ "candidates": [] })).await;
    let store_addr = start_mock_server(store.clone(), StatusCode::OK, json!([])).await;

    let (proxy, shutdown, _updates) = start_proxy(config_for(upstream_addr, store_addr)).await;

    let res = client()
        .post(format!("http://{}/chat", proxy))
        .json(&json!({ "message": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_cors(&res);
    let body: Value = res.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert_eq!(store.hits(), 0, "no userId must not query the store");
    assert_eq!(upstream.hits(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_rate_limited_upstream_is_not_retried() {
    let upstream = Recorder::default();
    let store = Recorder::default();
    let upstream_addr = start_mock_server(
        upstream.clone(),
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "code": 429, "message": "Resource exhausted" } }),
    )
    .await;
    let store_addr = start_mock_server(store.clone(), StatusCode::OK, json!([])).await;

    let (proxy, shutdown, _updates) = start_proxy(config_for(upstream_addr, store_addr)).await;

    let res = client()
        .post(format!("http://{}/chat", proxy))
        .json(&json!({ "message": "hello", "userId": "u1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_cors(&res);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "API request failed: 429");
    assert_eq!(upstream.hits(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_store_outage_degrades_or_fails_per_policy() {
    let upstream = Recorder::default();
    let store = Recorder::default();
    let upstream_addr = start_mock_server(upstream.clone(), StatusCode::OK, candidate("Take a breath.")).await;
    let store_addr = start_mock_server(
        store.clone(),
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "message": "unavailable" }),
    )
    .await;

    let (proxy, shutdown, updates) = start_proxy(config_for(upstream_addr, store_addr)).await;
    let url = format!("http://{}/chat", proxy);
    let request = json!({ "message": "hello", "userId": "u1" });

    let res = client().post(&url).json(&request).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["response"], "Take a breath.");
    let sent = upstream.last().unwrap().json();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(!prompt.contains("The user has selected these mental health goals"));

    let mut strict = config_for(upstream_addr, store_addr);
    strict.store.goal_lookup = GoalLookupPolicy::Fail;
    updates.send(strict).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = client().post(&url).json(&request).send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert_cors(&res);
    assert_eq!(upstream.hits(), 1, "failed lookup must stop before the upstream call");
    assert_eq!(store.hits(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_reload_supplies_missing_credential() {
    let upstream = Recorder::default();
    let store = Recorder::default();
    let upstream_addr = start_mock_server(upstream.clone(), StatusCode::OK, candidate("Welcome back.")).await;
    let store_addr = start_mock_server(store.clone(), StatusCode::OK, json!([])).await;

    let mut config = config_for(upstream_addr, store_addr);
    config.upstream.api_key = None;
    let (proxy, shutdown, updates) = start_proxy(config).await;
    let url = format!("http://{}/chat", proxy);

    let res = client().post(&url).json(&json!({ "message": "hi" })).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Gemini API key not configured");
    assert_eq!(upstream.hits(), 0);

    updates.send(config_for(upstream_addr, store_addr)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = client().post(&url).json(&json!({ "message": "hi" })).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["response"], "Welcome back.");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream() {
    let store = Recorder::default();
    let store_addr = start_mock_server(store, StatusCode::OK, json!([])).await;

    // Bind then drop to get a port with nothing listening.
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let (proxy, shutdown, _updates) = start_proxy(config_for(dead_addr, store_addr)).await;

    let res = client()
        .post(format!("http://{}/chat", proxy))
        .json(&json!({ "message": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_cors(&res);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("API request failed"));

    shutdown.trigger();
}
