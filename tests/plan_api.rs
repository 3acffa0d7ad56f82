use axum::body::Body;
use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use planfit::ai::config::AiConfig;
use planfit::{api_router, AppState, DEFAULT_LABELS};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state(chat_url: &str, api_token: Option<&str>) -> AppState {
    AppState {
        ai: AiConfig {
            api_key: "k".to_string(),
            model: "llama-3.1-70b-versatile".to_string(),
            chat_url: Some(chat_url.to_string()),
        },
        labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        api_token: api_token.map(str::to_string),
    }
}

fn profile_body() -> Value {
    json!({
        "goal": "get lean and improve stamina",
        "city": "Hyderabad",
        "area": "Himayat Nagar",
        "age": 25,
        "gender": "male",
        "weight": 65.0,
        "height": 1.7,
        "diet_preference": "vegetarian"
    })
}

fn plan_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/plan")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn mount_reply(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [ { "message": { "content": content } } ]
        })))
        .mount(server)
        .await;
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn plan_flow_splits_reply_into_sections() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        "Restaurants:\n- A\n- B\nBreakfast:\n- C\nDinner:\n- D\nWorkouts:\n- E\n- F",
    )
    .await;

    let url = format!("{}/v1/chat/completions", server.uri());
    let app = api_router(state(&url, None));

    let response = app.oneshot(plan_request(&profile_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 4);
    assert_eq!(sections[0]["label"], "Restaurants");
    assert_eq!(sections[0]["items"], json!(["A", "B"]));
    assert_eq!(sections[3]["label"], "Workouts");
    assert_eq!(sections[3]["items"], json!(["E", "F"]));
}

#[tokio::test]
async fn plan_rejects_blank_goal() {
    let server = MockServer::start().await;
    let url = format!("{}/v1/chat/completions", server.uri());
    let app = api_router(state(&url, None));

    let mut body = profile_body();
    body["goal"] = json!("   ");
    let response = app.oneshot(plan_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn plan_reports_empty_reply_as_upstream_failure() {
    let server = MockServer::start().await;
    mount_reply(&server, "").await;

    let url = format!("{}/v1/chat/completions", server.uri());
    let app = api_router(state(&url, None));

    let response = app.oneshot(plan_request(&profile_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response_json(response).await;
    assert_eq!(body["error"], "empty_plan");
}

#[tokio::test]
async fn plan_reports_completion_api_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("boom", "text/plain"))
        .mount(&server)
        .await;

    let url = format!("{}/v1/chat/completions", server.uri());
    let app = api_router(state(&url, None));

    let response = app.oneshot(plan_request(&profile_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response_json(response).await;
    assert_eq!(body["error"], "completion_failed");
}

#[tokio::test]
async fn configured_token_guards_all_routes() {
    let server = MockServer::start().await;
    let url = format!("{}/v1/chat/completions", server.uri());
    let app = api_router(state(&url, Some("secret")));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header(AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header(AUTHORIZATION, "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id_header() {
    let server = MockServer::start().await;
    let url = format!("{}/v1/chat/completions", server.uri());
    let app = api_router(state(&url, None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn fallback_used_when_reply_has_no_headers() {
    let server = MockServer::start().await;
    mount_reply(&server, "Cafe Uno\n\nIdli\n\nDal\n\nSquats\n\nPlank").await;

    let url = format!("{}/v1/chat/completions", server.uri());
    let app = api_router(state(&url, None));

    let response = app.oneshot(plan_request(&profile_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections[0]["items"], json!(["Cafe Uno"]));
    assert_eq!(sections[3]["items"], json!(["Squats", "Plank"]));
}
