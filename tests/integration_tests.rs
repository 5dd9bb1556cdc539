use address_book::{
    config::{Config, Environment},
    create_app,
    server::with_middleware,
    Server,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "test-token";

fn test_config() -> Config {
    Config {
        api_token: Some(TOKEN.to_string()),
        environment: Environment::Test,
        ..Config::default()
    }
}

fn valid_address() -> Value {
    json!({
        "firstName": "grace",
        "lastName": "hopper",
        "address1": "1 navy way",
        "city": "arlington",
        "state": "va",
        "zip": 22202
    })
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_address(body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/address")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn delete_address(id: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("DELETE")
        .uri(format!("/address/{}", id));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn list(app: &Router) -> Vec<Value> {
    let response = send(
        app,
        Request::builder().uri("/address").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_root_greeting() {
    let app = create_app(test_config());
    let response = send(&app, Request::builder().uri("/").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Hello, address book!");
}

#[tokio::test]
async fn test_list_returns_seed_records() {
    let app = create_app(test_config());
    let addresses = list(&app).await;

    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[0]["id"], "1234");
    assert_eq!(addresses[0]["firstName"], "nghi");
    assert_eq!(addresses[0]["address2"], "");
    assert_eq!(addresses[0]["zip"], 85051);
    assert_eq!(addresses[1]["zip"], 95203);
    assert_eq!(addresses[1]["id"], "5678");
    assert_eq!(addresses[1]["address2"], "apt 1092");
}

#[tokio::test]
async fn test_create_address() {
    let app = create_app(test_config());
    let response = send(&app, post_address(&valid_address(), Some(TOKEN))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    assert_eq!(location, format!("/address/{}", id));
    assert!(uuid_like(&id));
    assert_eq!(created["firstName"], "grace");
    assert_eq!(created["address2"], "");
    assert_eq!(created["zip"], 22202);

    let addresses = list(&app).await;
    assert_eq!(addresses.len(), 3);
    assert_eq!(addresses[2], created);
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let app = create_app(test_config());
    let first = body_json(send(&app, post_address(&valid_address(), Some(TOKEN))).await).await;
    let second = body_json(send(&app, post_address(&valid_address(), Some(TOKEN))).await).await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_location_uses_public_url() {
    let app = create_app(Config {
        public_url: "http://localhost:8000".to_string(),
        ..test_config()
    });
    let response = send(&app, post_address(&valid_address(), Some(TOKEN))).await;

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("http://localhost:8000/address/"));
}

#[tokio::test]
async fn test_text_zip_keeps_leading_zero() {
    let app = create_app(test_config());
    let mut body = valid_address();
    body["zip"] = json!("02134");

    let response = send(&app, post_address(&body, Some(TOKEN))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["zip"], "02134");
}

#[tokio::test]
async fn test_bad_location_leaves_store_unchanged() {
    let app = create_app(Config {
        public_url: "http://local\nhost".to_string(),
        ..test_config()
    });
    let response = send(&app, post_address(&valid_address(), Some(TOKEN))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let app = create_app(test_config());

    let mut missing = valid_address();
    missing.as_object_mut().unwrap().remove("city");
    let mut bad_state = valid_address();
    bad_state["state"] = json!("ariz");
    let mut bad_zip = valid_address();
    bad_zip["zip"] = json!("abcde");
    let mut short_zip = valid_address();
    short_zip["zip"] = json!(123);

    let cases = [
        (missing, "missing required field: city"),
        (bad_state, "state must be 2 characters"),
        (bad_zip, "zip must be numerical"),
        (short_zip, "zip must be 5 digits"),
    ];

    for (body, message) in cases {
        let response = send(&app, post_address(&body, Some(TOKEN))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], message);
    }

    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = create_app(test_config());
    let request = Request::builder()
        .method("POST")
        .uri("/address")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .body(Body::from("{\"firstName\":"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");
    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = create_app(test_config());

    for token in [None, Some("wrong-token")] {
        let response = send(&app, post_address(&valid_address(), token)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Not Authorized");
    }

    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn test_unconfigured_token_rejects_everything() {
    let app = create_app(Config {
        api_token: None,
        ..test_config()
    });
    let response = send(&app, post_address(&valid_address(), Some(""))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn test_delete_seed_address() {
    let app = create_app(test_config());
    let response = send(&app, delete_address("1234", Some(TOKEN))).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let addresses = list(&app).await;
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0]["id"], "5678");
}

#[tokio::test]
async fn test_delete_missing_address() {
    let app = create_app(test_config());
    let response = send(&app, delete_address("9999", Some(TOKEN))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "not found: address 9999");
    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn test_delete_created_address() {
    let app = create_app(test_config());
    let created = body_json(send(&app, post_address(&valid_address(), Some(TOKEN))).await).await;
    let id = created["id"].as_str().unwrap();

    let response = send(&app, delete_address(id, Some(TOKEN))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let ids: Vec<Value> = list(&app).await.into_iter().map(|a| a["id"].clone()).collect();
    assert_eq!(ids, vec![json!("1234"), json!("5678")]);
}

#[tokio::test]
async fn test_delete_requires_token() {
    let app = create_app(test_config());
    let response = send(&app, delete_address("1234", Some("wrong-token"))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = create_app(test_config());
    let response = send(&app, Request::builder().uri("/address").body(Body::empty()).unwrap()).await;

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_app(test_config());
    let response = send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["addresses"], 2);
}

async fn explode() -> &'static str {
    panic!("database exploded")
}

fn panicking_app(environment: Environment) -> Router {
    with_middleware(Router::new().route("/boom", get(explode)), environment)
}

#[tokio::test]
async fn test_panic_detail_outside_production() {
    let app = panicking_app(Environment::Development);
    let response = send(&app, Request::builder().uri("/boom").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "database exploded");
}

#[tokio::test]
async fn test_panic_is_generic_in_production() {
    let app = panicking_app(Environment::Production);
    let response = send(&app, Request::builder().uri("/boom").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "server error");
}

#[tokio::test]
async fn test_end_to_end_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(Server::new(test_config()).serve(listener));

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let response = client
        .post(format!("{}/address", base))
        .bearer_auth(TOKEN)
        .json(&valid_address())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();

    let addresses: Vec<Value> = client
        .get(format!("{}/address", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(addresses.len(), 3);

    let response = client
        .delete(format!("{}/address/{}", base, created["id"].as_str().unwrap()))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
}

fn uuid_like(id: &str) -> bool {
    id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
}
