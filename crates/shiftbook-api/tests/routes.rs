//! Router-level tests: real SQLite store, requests through `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use shiftbook_api::rate_limit::WriteLimiter;
use shiftbook_api::{AppStateInner, router};
use shiftbook_db::Database;
use shiftbook_types::api::Claims;

const SECRET: &str = "router-test-secret";

fn app_with_limit(limit: u32) -> Router {
    let state = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        jwt_secret: SECRET.to_string(),
        token_ttl: chrono::Duration::days(1),
        write_limiter: WriteLimiter::new(limit, Duration::from_secs(60)),
    });
    router(state)
}

fn app() -> Router {
    app_with_limit(100)
}

fn token_for(user: Uuid, roles: &[&str]) -> String {
    let claims = Claims {
        sub: user,
        username: "tester".into(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_employer(app: &Router, token: &str, rate: f64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/employers",
        Some(token),
        Some(json!({ "name": "Cafe", "hourlyRate": rate })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(&app(), "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn register_login_and_duplicate() {
    let app = app();
    let creds = json!({ "username": "alice", "password": "correct horse" });

    let (status, body) = send(&app, "POST", "/auth/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", "/auth/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = send(&app, "POST", "/auth/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    // A freshly registered user may write.
    let (status, _) = send(
        &app,
        "POST",
        "/employers",
        Some(&token),
        Some(json!({ "name": "Cafe", "hourlyRate": 15 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn resources_need_a_valid_token() {
    let app = app();
    let (status, body) = send(&app, "GET", "/shifts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, "GET", "/shifts", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn shift_pay_and_totals_over_http() {
    let app = app();
    let token = token_for(Uuid::new_v4(), &["user"]);
    let employer_id = create_employer(&app, &token, 20.0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/shifts",
        Some(&token),
        Some(json!({
            "employerId": employer_id,
            "startTime": "2024-03-01T09:00:00Z",
            "endTime": "2024-03-01 17:00",
            "tips": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Shift created");
    let shift_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/shifts?includeTotals=true", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let item = &body["data"]["items"][0];
    assert_eq!(item["id"], shift_id.as_str());
    assert_eq!(item["hours"], 8.0);
    assert_eq!(item["pay"], 170.0);
    assert_eq!(body["data"]["totals"]["byDay"]["2024-03-01"]["pay"], 170.0);
    assert_eq!(body["data"]["totals"]["byMonth"]["2024-03"]["hours"], 8.0);

    let (_, body) = send(&app, "GET", "/shifts", Some(&token), None).await;
    assert!(body["data"].get("totals").map_or(true, Value::is_null));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/shifts/{shift_id}"),
        Some(&token),
        Some(json!({ "tips": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tips"], 0.0);
    assert_eq!(body["data"]["startTime"], "2024-03-01T09:00:00Z");

    let (status, body) = send(&app, "DELETE", &format!("/shifts/{shift_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Shift deleted");

    let (status, _) = send(&app, "GET", &format!("/shifts/{shift_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn records_of_other_users_are_not_found() {
    let app = app();
    let alice = token_for(Uuid::new_v4(), &["user"]);
    let bob = token_for(Uuid::new_v4(), &["user"]);
    let employer_id = create_employer(&app, &alice, 20.0).await;

    let (status, body) = send(&app, "GET", &format!("/employers/{employer_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], format!("Employer with id {employer_id} not found"));

    let (status, _) = send(&app, "DELETE", &format!("/employers/{employer_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/employers", Some(&bob), None).await;
    assert_eq!(body["data"], json!([]));
    let (_, body) = send(&app, "GET", "/employers", Some(&alice), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bad_input_is_a_validation_error() {
    let app = app();
    let token = token_for(Uuid::new_v4(), &["user"]);

    let (status, body) = send(
        &app,
        "POST",
        "/shifts",
        Some(&token),
        Some(json!({ "employerId": "e1", "startTime": "soon", "endTime": "later" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        "POST",
        "/employers",
        Some(&token),
        Some(json!({ "name": "Cafe", "hourlyRate": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/adjustments",
        Some(&token),
        Some(json!({ "date": "2024-03-01", "amount": 25 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "either employerId or shiftId is required");

    let (status, body) = send(
        &app,
        "POST",
        "/employers",
        Some(&token),
        Some(json!({ "name": "Cafe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn adjustments_filter_by_both_references() {
    let app = app();
    let token = token_for(Uuid::new_v4(), &["user"]);

    for (employer, shift) in [("e1", "s1"), ("e1", "s2"), ("e2", "s1")] {
        let (status, _) = send(
            &app,
            "POST",
            "/adjustments",
            Some(&token),
            Some(json!({
                "date": "2024-03-01T00:00:00Z",
                "amount": -5.5,
                "employerId": employer,
                "shiftId": shift,
                "note": "uniform",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/adjustments?employerId=e1", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/adjustments?employerId=e1&shiftId=s1", Some(&token), None).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["amount"], -5.5);
}

#[tokio::test]
async fn writes_need_the_user_role() {
    let app = app();
    let reader = token_for(Uuid::new_v4(), &[]);

    let (status, _) = send(&app, "GET", "/employers", Some(&reader), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/employers",
        Some(&reader),
        Some(json!({ "name": "Cafe", "hourlyRate": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn writes_are_rate_limited_per_caller() {
    let app = app_with_limit(2);
    let alice = token_for(Uuid::new_v4(), &["user"]);
    let bob = token_for(Uuid::new_v4(), &["user"]);

    create_employer(&app, &alice, 20.0).await;
    create_employer(&app, &alice, 20.0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/employers",
        Some(&alice),
        Some(json!({ "name": "Cafe", "hourlyRate": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMITED");

    // Reads are not counted, and other callers have their own budget.
    let (status, _) = send(&app, "GET", "/employers", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    create_employer(&app, &bob, 20.0).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_of_one_name_create_one_user() {
    let app = app();
    let creds = json!({ "username": "alice", "password": "correct horse" });

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            let creds = creds.clone();
            tokio::spawn(async move { send(&app, "POST", "/auth/register", None, Some(creds)).await.0 })
        })
        .collect();

    let mut statuses = Vec::new();
    for attempt in attempts {
        statuses.push(attempt.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 7);

    let (status, _) = send(&app, "POST", "/auth/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn blank_query_filters_list_everything() {
    let app = app();
    let token = token_for(Uuid::new_v4(), &["user"]);
    let employer_id = create_employer(&app, &token, 20.0).await;

    let (status, _) = send(
        &app,
        "POST",
        "/shifts",
        Some(&token),
        Some(json!({
            "employerId": employer_id,
            "startTime": "2024-03-01T09:00:00Z",
            "endTime": "2024-03-01T17:00:00Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/shifts?employerId=", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/shifts?employerId=&includeTotals=", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert!(body["data"].get("totals").map_or(true, Value::is_null));

    let (status, body) = send(&app, "GET", "/shifts?includeTotals=1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totals"]["byDay"]["2024-03-01"]["pay"], 160.0);

    let (status, body) = send(&app, "GET", "/shifts?includeTotals=maybe", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        "POST",
        "/adjustments",
        Some(&token),
        Some(json!({ "date": "2024-03-01", "amount": 5, "employerId": employer_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/adjustments?employerId=&shiftId=", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
