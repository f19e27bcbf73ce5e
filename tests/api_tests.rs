use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use user_registry::config::EnvironmentConfig;
use user_registry::repositories::MemoryStore;
use user_registry::{create_router, AppState};

fn create_test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), EnvironmentConfig::default());
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

fn lula() -> Value {
    json!({
        "userId": 0,
        "name": "Luiz Inacio",
        "surName": "da Silva",
        "birthDate": "22/02/1972",
        "cpf": "123.456.789-10",
        "email": "lula@prov.com"
    })
}

fn glasshouse() -> Value {
    json!({
        "addressId": 0,
        "publicPlace": "Avenida",
        "streetAddress": "Glasshouse, 69",
        "complement": "1001",
        "city": "Rio",
        "state": "RJ",
        "zipCode": "69.069-069"
    })
}

async fn create_lula(app: &Router) -> i64 {
    let (status, body) = send(app, Method::POST, "/rest-api/users", Some(lula())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["userId"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "development");
}

// S1
#[tokio::test]
async fn test_create_user_round_trip() {
    let app = create_test_app();
    let user_id = create_lula(&app).await;
    assert_ne!(user_id, 0);

    let (status, body) = send(&app, Method::GET, &format!("/rest-api/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    for field in ["name", "surName", "birthDate", "cpf", "email"] {
        assert_eq!(body[field], lula()[field], "campo {}", field);
    }
    assert!(body["addressDTO"].is_null());
    assert_eq!(body["phonesDTO"], json!([]));
}

// S2 + S3
#[tokio::test]
async fn test_address_cardinality_and_cascade() {
    let app = create_test_app();
    let user_id = create_lula(&app).await;
    let uri = format!("/rest-api/adresses/{}", user_id);

    let (status, body) = send(&app, Method::POST, &uri, Some(glasshouse())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["zipCode"], "69.069-069");
    assert_eq!(body["userDTO"]["userId"], user_id);

    let (status, _) = send(&app, Method::POST, &uri, Some(glasshouse())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, &format!("/rest-api/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["addressDTO"]["city"], "Rio");
    assert!(body["addressDTO"].get("userDTO").is_none());

    let (status, _) = send(&app, Method::DELETE, &format!("/rest-api/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &format!("/rest-api/phones/{}", user_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// S4
#[tokio::test]
async fn test_duplicate_cpf() {
    let app = create_test_app();
    create_lula(&app).await;

    let dilma = json!({
        "userId": 0,
        "name": "Dilma",
        "surName": "Rousseff",
        "birthDate": "14/12/1947",
        "cpf": "123.456.789-10",
        "email": "dilma@prov.com"
    });
    let (status, body) = send(&app, Method::POST, "/rest-api/users", Some(dilma)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_string());
}

// S5 + S6
#[tokio::test]
async fn test_phone_create_and_update() {
    let app = create_test_app();
    let user_id = create_lula(&app).await;
    let uri = format!("/rest-api/phones/{}", user_id);

    let (status, created) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({"phoneId": 0, "type": "Cel", "number": "(21) 96687-8776"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let phone_id = created["phoneId"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let phones = body.as_array().unwrap();
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0]["number"], "(21) 96687-8776");

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"phoneId": phone_id, "type": "Mob", "number": "(21) 98966-2377"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let phones = body.as_array().unwrap();
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0]["number"], "(21) 98966-2377");
    assert_eq!(phones[0]["type"], "Mob");
}

#[tokio::test]
async fn test_delete_phone_keeps_user() {
    let app = create_test_app();
    let user_id = create_lula(&app).await;
    let uri = format!("/rest-api/phones/{}", user_id);

    let (_, created) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({"phoneId": 0, "type": "Cel", "number": "(21) 96687-8776"})),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, &uri, Some(json!({"phoneId": created["phoneId"]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(created)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &format!("/rest-api/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_listings_are_not_found() {
    let app = create_test_app();
    for uri in ["/rest-api/users", "/rest-api/adresses", "/rest-api/phones"] {
        let (status, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    create_lula(&app).await;
    let (status, body) = send(&app, Method::GET, "/rest-api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_update_missing_user() {
    let app = create_test_app();
    let (status, _) = send(&app, Method::PUT, "/rest-api/users/42", Some(lula())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/rest-api/users/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/rest-api/adresses/42", Some(glasshouse())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_bodies() {
    let app = create_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/rest-api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut iso_date = lula();
    iso_date["birthDate"] = json!("1972-02-22");
    let (status, _) = send(&app, Method::POST, "/rest-api/users", Some(iso_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_email = lula();
    bad_email["email"] = json!("lula");
    let (status, _) = send(&app, Method::POST, "/rest-api/users", Some(bad_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_idempotent_reads() {
    let app = create_test_app();
    let user_id = create_lula(&app).await;
    let uri = format!("/rest-api/users/{}", user_id);

    let (_, first) = send(&app, Method::GET, &uri, None).await;
    let (_, second) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(first, second);
}
