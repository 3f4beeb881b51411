//! Shared fixtures: a SWAPI double and request helpers.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use star_wars_api::{build_app, AppState};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_EMAIL: &str = "planet@example.com";
pub const TEST_NAME: &str = "planetuser";
pub const TEST_PASSWORD: &str = "planetpassword";

fn planet_json(name: &str, films: &[u32]) -> Value {
    json!({
        "name": name,
        "climate": "temperate",
        "terrain": "grasslands, mountains",
        "films": films
            .iter()
            .map(|id| format!("https://swapi.dev/api/films/{id}/"))
            .collect::<Vec<_>>(),
        "url": "https://swapi.dev/api/planets/2/"
    })
}

fn page(results: Vec<Value>) -> Value {
    json!({ "count": results.len(), "next": null, "previous": null, "results": results })
}

async fn mount_search(server: &MockServer, term: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .and(query_param("search", term))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// SWAPI stand-in. Unknown searches fall through to wiremock's 404.
pub async fn swapi_double() -> MockServer {
    let server = MockServer::start().await;
    mount_search(&server, "Alderaan", page(vec![planet_json("Alderaan", &[1, 6])])).await;
    mount_search(&server, "Polis Massa", page(vec![planet_json("Polis Massa", &[6])])).await;
    mount_search(&server, "Lorem Ipsum", page(vec![])).await;
    mount_search(&server, "Hoth", page(vec![planet_json("Hoth", &[2])])).await;
    mount_search(&server, "Dagobah", page(vec![planet_json("Dagobah", &[2, 3, 6])])).await;
    mount_search(
        &server,
        "Ta",
        page(vec![planet_json("Tatooine", &[1, 3, 4, 5, 6]), planet_json("Taris", &[])]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/planets/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(planet_json("Alderaan", &[1, 6])))
        .mount(&server)
        .await;
    server
}

pub fn swapi_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub async fn test_app(swapi: &MockServer) -> (Router, AppState) {
    let state = AppState::in_memory(&swapi_base(swapi)).expect("state");
    (build_app(state.clone()), state)
}

pub fn request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "testserver");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

pub async fn signup(app: &Router, email: &str, name: &str, password: &str) -> Value {
    let body = json!({ "email": email, "name": name, "password": password });
    let (status, json) = send(app, request(Method::POST, "/users/", Some(body), None)).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {json}");
    json
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let body = json!({ "username": email, "password": password });
    let (status, json) = send(app, request(Method::POST, "/login/", Some(body), None)).await;
    assert_eq!(status, StatusCode::OK, "login failed: {json}");
    json["token"].as_str().expect("token in login response").to_string()
}

/// Signs up the default test user and returns their token.
pub async fn logged_in(app: &Router) -> String {
    signup(app, TEST_EMAIL, TEST_NAME, TEST_PASSWORD).await;
    login(app, TEST_EMAIL, TEST_PASSWORD).await
}

pub fn alderaan() -> Value {
    json!({ "name": "Alderaan", "climate": "temperate", "terrain": "grasslands, mountains" })
}
