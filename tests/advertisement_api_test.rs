use adboard::{AppConfig, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const USERS: &str = r#"
[[users]]
id = 1
username = "alice"
first_name = "Alice"
last_name = "Smith"
token = "alice-token"

[[users]]
id = 2
username = "bob"
token = "bob-token"
"#;

async fn spawn_app(config_toml: &str) -> String {
    let config = AppConfig::from_toml_str(config_toml).unwrap();
    let state = AppState::from_config(&config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Err(err) = adboard::serve(listener, state).await {
            eprintln!("test server stopped: {}", err);
        }
    });
    format!("http://{}/api/advertisements/", addr)
}

async fn create(client: &Client, base: &str, token: &str, body: Value) -> reqwest::Response {
    client
        .post(base)
        .header("Authorization", format!("Token {}", token))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn open_count(client: &Client, base: &str, creator: u64) -> usize {
    let ads: Vec<Value> = client
        .get(format!("{}?creator={}&status=OPEN", base, creator))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    ads.len()
}

#[tokio::test]
async fn test_anonymous_can_read_but_not_create() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    let created = create(&client, &base, "alice-token", json!({"title": "Bike"})).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let ad: Value = created.json().await.unwrap();

    let list = client.get(&base).send().await.unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let ads: Vec<Value> = list.json().await.unwrap();
    assert_eq!(ads.len(), 1);

    let one = client
        .get(format!("{}{}/", base, ad["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(one.status(), StatusCode::OK);

    let anon_create = client
        .post(&base)
        .json(&json!({"title": "Sneaky"}))
        .send()
        .await
        .unwrap();
    assert_eq!(anon_create.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_ignores_supplied_creator() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    let response = create(
        &client,
        &base,
        "alice-token",
        json!({"title": "Sofa", "description": "Green", "creator": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let ad: Value = response.json().await.unwrap();
    assert_eq!(ad["creator"]["id"], 1);
    assert_eq!(ad["creator"]["username"], "alice");
    assert_eq!(ad["creator"]["first_name"], "Alice");
    assert_eq!(ad["status"], "OPEN");
    assert_eq!(ad["description"], "Green");
    assert!(ad["created_at"].is_string());
    assert!(ad["creator"].get("token").is_none());
}

#[tokio::test]
async fn test_eleventh_open_advertisement_is_rejected() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    for i in 0..10 {
        let response = create(
            &client,
            &base,
            "alice-token",
            json!({"title": format!("ad {}", i), "status": "OPEN"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let rejected = create(&client, &base, "alice-token", json!({"title": "one more"})).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    let body: Value = rejected.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("currently have 10 open"), "{}", detail);

    assert_eq!(open_count(&client, &base, 1).await, 10);

    // the cap is per user
    let bob = create(&client, &base, "bob-token", json!({"title": "bob's"})).await;
    assert_eq!(bob.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_reopening_respects_the_cap() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    let closed: Value = create(
        &client,
        &base,
        "alice-token",
        json!({"title": "winter tyres", "status": "CLOSED"}),
    )
    .await
    .json()
    .await
    .unwrap();
    let closed_url = format!("{}{}/", base, closed["id"]);

    for i in 0..9 {
        create(&client, &base, "alice-token", json!({"title": format!("ad {}", i)})).await;
    }

    let reopened = client
        .patch(&closed_url)
        .header("Authorization", "Token alice-token")
        .json(&json!({"status": "OPEN"}))
        .send()
        .await
        .unwrap();
    assert_eq!(reopened.status(), StatusCode::OK);
    assert_eq!(open_count(&client, &base, 1).await, 10);

    // close it again, fill the slot, then try to reopen
    let closed_again = client
        .patch(&closed_url)
        .header("Authorization", "Token alice-token")
        .json(&json!({"status": "CLOSED"}))
        .send()
        .await
        .unwrap();
    assert_eq!(closed_again.status(), StatusCode::OK);
    create(&client, &base, "alice-token", json!({"title": "tenth"})).await;

    let rejected = client
        .put(&closed_url)
        .header("Authorization", "Token alice-token")
        .json(&json!({"title": "winter tyres", "status": "OPEN"}))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert_eq!(open_count(&client, &base, 1).await, 10);
}

#[tokio::test]
async fn test_only_creator_may_modify() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    let ad: Value = create(&client, &base, "alice-token", json!({"title": "Lamp"}))
        .await
        .json()
        .await
        .unwrap();
    let url = format!("{}{}/", base, ad["id"]);

    let bob_update = client
        .patch(&url)
        .header("Authorization", "Token bob-token")
        .json(&json!({"title": "Mine now"}))
        .send()
        .await
        .unwrap();
    assert_eq!(bob_update.status(), StatusCode::FORBIDDEN);

    let bob_delete = client
        .delete(&url)
        .header("Authorization", "Token bob-token")
        .send()
        .await
        .unwrap();
    assert_eq!(bob_delete.status(), StatusCode::FORBIDDEN);

    let anon_delete = client.delete(&url).send().await.unwrap();
    assert_eq!(anon_delete.status(), StatusCode::FORBIDDEN);

    let alice_update = client
        .patch(&url)
        .header("Authorization", "Token alice-token")
        .json(&json!({"title": "Desk lamp"}))
        .send()
        .await
        .unwrap();
    assert_eq!(alice_update.status(), StatusCode::OK);
    let updated: Value = alice_update.json().await.unwrap();
    assert_eq!(updated["title"], "Desk lamp");

    let alice_delete = client
        .delete(&url)
        .header("Authorization", "Bearer alice-token")
        .send()
        .await
        .unwrap();
    assert_eq!(alice_delete.status(), StatusCode::NO_CONTENT);

    let gone = client.get(&url).send().await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    let response = client
        .get(&base)
        .header("Authorization", "Token nobody")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_filters() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    create(&client, &base, "alice-token", json!({"title": "a1"})).await;
    create(&client, &base, "alice-token", json!({"title": "a2", "status": "CLOSED"})).await;
    create(&client, &base, "bob-token", json!({"title": "b1"})).await;

    let closed: Vec<Value> = client
        .get(format!("{}?status=CLOSED", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0]["title"], "a2");

    let bobs: Vec<Value> = client
        .get(format!("{}?creator=2", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0]["title"], "b1");

    let future: Vec<Value> = client
        .get(format!("{}?created_at_after=2999-01-01T00:00:00Z", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(future.is_empty());
}

#[tokio::test]
async fn test_anonymous_throttle() {
    let config = format!("[throttle]\nanon = \"2/minute\"\n{}", USERS);
    let base = spawn_app(&config).await;
    let client = Client::new();

    for _ in 0..2 {
        let response = client.get(&base).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let throttled = client.get(&base).send().await.unwrap();
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(throttled.headers().contains_key("retry-after"));

    let authenticated = client
        .get(&base)
        .header("Authorization", "Token alice-token")
        .send()
        .await
        .unwrap();
    assert_eq!(authenticated.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_missing_records() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    let health_url = base.replace("/api/advertisements/", "/health");
    let health: Value = client.get(&health_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(health["status"], "ok");

    let missing = client.get(format!("{}999/", base)).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let no_slash = client
        .get(base.trim_end_matches('/'))
        .send()
        .await
        .unwrap();
    assert_eq!(no_slash.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_requests_answer_with_detail() {
    let base = spawn_app(USERS).await;
    let client = Client::new();

    let bad_status = create(&client, &base, "alice-token", json!({ "title": "x", "status": "DRAFT" })).await;
    assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);
    let body: Value = bad_status.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("body"));

    let bad_id = client.get(format!("{}abc/", base)).send().await.unwrap();
    assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
    let body: Value = bad_id.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("path"));

    let bad_filter = client
        .get(format!("{}?status=DRAFT", base))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_filter.status(), StatusCode::BAD_REQUEST);
    let body: Value = bad_filter.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("query"));

    // nothing was stored by the rejected create
    assert_eq!(open_count(&client, &base, 1).await, 0);
}
