use axum::{
    body::Body,
    extract::{Extension, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::ai::config::AiConfig;
use crate::ai::recommend::request_plan;
use crate::extract::extract;
use crate::profile::UserProfile;
use crate::system_info::get_system_info;

#[derive(Clone)]
pub struct AppState {
    pub ai: AiConfig,
    pub labels: Vec<String>,
    /// When set, every request must carry this bearer token.
    pub api_token: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct InfoResponse {
    info: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);
    let auth_layer = middleware::from_fn_with_state(state.clone(), require_auth);
    let request_id_layer = middleware::from_fn(assign_request_id);
    Router::new()
        .route("/api/health", get(health))
        .route("/api/info", get(info))
        .route("/api/plan", post(generate_plan))
        .with_state(state)
        .layer(auth_layer)
        .layer(request_id_layer)
}

async fn require_auth(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = match state.api_token.as_deref() {
        Some(expected) => expected,
        None => return next.run(req).await,
    };

    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.as_str())
        .unwrap_or("unknown");
    let token = match extract_bearer_token(req.headers()) {
        Some(token) => token,
        None => {
            tracing::debug!(request_id, "Missing bearer token");
            return unauthorized_response();
        }
    };

    if token != expected {
        tracing::debug!(request_id, token_preview = %token_preview(&token), "Bearer token rejected");
        return unauthorized_response();
    }

    next.run(req).await
}

async fn health() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

async fn info() -> Response {
    (
        StatusCode::OK,
        Json(InfoResponse {
            info: get_system_info(),
        }),
    )
        .into_response()
}

async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Extension(request): Extension<RequestContext>,
    Json(profile): Json<UserProfile>,
) -> Response {
    if let Some(field) = profile.missing_required_field() {
        tracing::debug!(
            request_id = %request.request_id,
            field,
            "Rejecting incomplete profile"
        );
        return bad_request_response();
    }

    let reply = match request_plan(
        &state.ai.api_key,
        &state.ai.model,
        &profile,
        &state.labels,
        state.ai.chat_url.as_deref(),
    )
    .await
    {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!(
                request_id = %request.request_id,
                error = %err,
                "Completion request failed"
            );
            return upstream_error_response();
        }
    };

    let plan = extract(&reply, &state.labels);
    if plan.is_empty() {
        tracing::warn!(
            request_id = %request.request_id,
            reply_len = reply.len(),
            "Nothing could be parsed from the model reply"
        );
        return empty_plan_response();
    }

    tracing::debug!(
        request_id = %request.request_id,
        item_count = plan.sections.iter().map(|s| s.items.len()).sum::<usize>(),
        "Generated plan"
    );
    (StatusCode::OK, Json(plan)).into_response()
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn token_preview(token: &str) -> String {
    token.chars().take(6).collect()
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let mut response = next.run(req).await;
    let status = response.status();
    let header_value = match request_id.parse() {
        Ok(value) => value,
        Err(_) => {
            return response;
        }
    };
    response
        .headers_mut()
        .insert(HeaderName::from_static("x-request-id"), header_value);
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "unauthorized",
        }),
    )
        .into_response()
}

fn bad_request_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "invalid_request",
        }),
    )
        .into_response()
}

fn upstream_error_response() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: "completion_failed",
        }),
    )
        .into_response()
}

fn empty_plan_response() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse { error: "empty_plan" }),
    )
        .into_response()
}
