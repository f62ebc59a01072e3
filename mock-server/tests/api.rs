use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

const AUTH: &str = "Basic dGVzdC1rZXk6";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let resp = app.clone().oneshot(json_request("POST", uri, body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_return_envelope() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v2/organization")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "InvalidCredentials");
    assert_eq!(body["message"]["error"], 1102);
}

// --- organization ---

#[tokio::test]
async fn organization_is_fixed() {
    let resp = app().oneshot(request("GET", "/api/v2/organization")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["id"], mock_server::ORGANIZATION_ID);
}

// --- workers ---

#[tokio::test]
async fn list_workers_empty() {
    let resp = app().oneshot(request("GET", "/api/v2/workers")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn create_worker_maps_team_ids_to_teams() {
    let app = app();
    let worker = create(
        &app,
        "/api/v2/workers",
        json!({"name": "Ada", "phone": "+15555550100", "team_ids": ["t1"]}),
    )
    .await;
    assert_eq!(worker["teams"], json!(["t1"]));
    assert_eq!(worker["onDuty"], false);

    let id = worker["id"].as_str().unwrap();
    let resp = app
        .oneshot(request("GET", &format!("/api/v2/workers/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, worker);
}

#[tokio::test]
async fn create_worker_missing_phone_is_invalid_argument() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v2/workers", json!({"name": "Ada"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "InvalidArgument");
    assert_eq!(body["message"]["cause"], json!({"missingProperties": ["phone"]}));
}

#[tokio::test]
async fn update_and_delete_worker() {
    let app = app();
    let worker = create(
        &app,
        "/api/v2/workers",
        json!({"name": "Ada", "phone": "+15555550100"}),
    )
    .await;
    let uri = format!("/api/v2/workers/{}", worker["id"].as_str().unwrap());

    let resp = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({"name": "Ada L."})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["name"], "Ada L.");

    let resp = app.clone().oneshot(request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app.oneshot(request("GET", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["code"], "ResourceNotFound");
}

// --- destinations ---

#[tokio::test]
async fn destination_geocodes_single_match() {
    let dest = create(
        &app(),
        "/api/v2/destinations",
        json!({"address": {"unparsed": "1252 Howard"}}),
    )
    .await;
    assert_eq!(dest["address"]["unparsed"], "1252 Howard St, San Francisco, CA");
    assert_eq!(dest["location"], json!([-122.4108, 37.7749]));
}

#[tokio::test]
async fn ambiguous_destination_lists_options_in_cause() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v2/destinations",
            json!({"address": {"unparsed": "123 Main St"}}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    let cause = body["message"]["cause"].as_str().unwrap();
    assert!(cause.contains("Options = ["));
    assert!(cause.contains("123 Main St, Shelbyville"));
}

// --- tasks ---

#[tokio::test]
async fn create_task_with_inline_destination_and_recipient() {
    let app = app();
    let task = create(
        &app,
        "/api/v2/tasks",
        json!({
            "merchant": null,
            "executor": null,
            "destination": {"address": {"number": "73", "street": "Sumner St"}},
            "recipients": [{"name": "Bo", "phone": "+15555550101", "notes": null}],
            "completeAfter": 1_700_000_000
        }),
    )
    .await;
    assert_eq!(task["state"], 0);
    assert_eq!(task["completeAfter"], 1_700_000_000);
    assert_eq!(task["recipients"][0]["name"], "Bo");
    assert_eq!(task["shortId"].as_str().unwrap().len(), 8);

    let uri = format!("/api/v2/tasks/{}", task["id"].as_str().unwrap());
    let resp = app.clone().oneshot(request("GET", &uri)).await.unwrap();
    assert_eq!(body_json(resp).await, task);

    let resp = app.clone().oneshot(request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.oneshot(request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_task_without_destination_fails() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v2/tasks", json!({"recipients": []})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"]["cause"], json!({"missingProperties": ["destination"]}));
}

// --- admins ---

#[tokio::test]
async fn create_admin_defaults_to_standard() {
    let app = app();
    let admin = create(
        &app,
        "/api/v2/admins",
        json!({"name": "Ada", "email": "ada@example.com"}),
    )
    .await;
    assert_eq!(admin["type"], "standard");

    let resp = app.oneshot(request("GET", "/api/v2/admins")).await.unwrap();
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);
}
