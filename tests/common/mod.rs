//! Minimal CRUD service the load runs are pointed at

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use stampede_config::StampedeConfig;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const AGENT_PASSWORD: &str = "agent-secret";

#[derive(Debug, Default)]
pub struct ServiceState {
    issued: u64,
    access: HashSet<String>,
    refresh: HashSet<String>,
    items: Vec<Value>,
    next_id: u64,
    /// Answer every authenticated route with 500
    pub fail_all: bool,
    pub logins: HashMap<String, usize>,
    pub logouts: usize,
    pub created: usize,
}

pub type SharedState = Arc<Mutex<ServiceState>>;

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn issue(state: &mut ServiceState) -> Value {
    state.issued += 1;
    let access = format!("at-{}", state.issued);
    let refresh = format!("rt-{}", state.issued);
    state.access.insert(access.clone());
    state.refresh.insert(refresh.clone());
    json!({ "data": { "accessToken": access, "refreshToken": refresh } })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Token and fault checks shared by every non-auth route
fn guard(state: &ServiceState, headers: &HeaderMap) -> Option<Response> {
    let authorized = bearer(headers).is_some_and(|token| state.access.contains(&token));
    if !authorized {
        return Some(error(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    if state.fail_all {
        return Some(error(StatusCode::INTERNAL_SERVER_ERROR, "Injected failure"));
    }
    None
}

async fn login(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();
    let expected = if username == "admin" { ADMIN_PASSWORD } else { AGENT_PASSWORD };
    if password != expected {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let mut state = state.lock();
    *state.logins.entry(username).or_insert(0) += 1;
    Json(issue(&mut state)).into_response()
}

async fn refresh(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();
    let token = body["refreshToken"].as_str().unwrap_or_default();
    if !state.refresh.remove(token) {
        return error(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    }
    Json(issue(&mut state)).into_response()
}

async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> StatusCode {
    let mut state = state.lock();
    if let Some(token) = bearer(&headers) {
        state.access.remove(&token);
    }
    state.logouts += 1;
    StatusCode::NO_CONTENT
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    Json(json!({ "data": { "id": 1, "role": "standard" } })).into_response()
}

async fn list_items(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    let limit = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20);
    let page: Vec<Value> = state.items.iter().rev().take(limit).cloned().collect();
    Json(json!({ "data": page, "total": state.items.len() })).into_response()
}

async fn create_item(State(state): State<SharedState>, headers: HeaderMap, Json(mut body): Json<Value>) -> Response {
    let mut state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    if body["name"].as_str().is_none() || body["categoryId"].is_null() {
        return error(StatusCode::BAD_REQUEST, "name and categoryId are required");
    }
    state.next_id += 1;
    body["id"] = json!(state.next_id);
    state.items.push(body.clone());
    state.created += 1;
    (StatusCode::CREATED, Json(json!({ "data": body }))).into_response()
}

async fn get_item(State(state): State<SharedState>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    let state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    match state.items.iter().find(|item| item["id"] == json!(id)) {
        Some(item) => Json(json!({ "data": item })).into_response(),
        None => error(StatusCode::NOT_FOUND, "Item not found"),
    }
}

async fn update_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    match state.items.iter_mut().find(|item| item["id"] == json!(id)) {
        Some(item) => {
            if let (Some(item), Some(changes)) = (item.as_object_mut(), body.as_object()) {
                item.extend(changes.clone());
            }
            Json(json!({ "data": item })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Item not found"),
    }
}

async fn categories(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    Json(json!({ "data": [{ "id": 1, "name": "Tools" }, { "id": 2, "name": "Hardware" }] })).into_response()
}

async fn locations(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    Json(json!({ "data": [{ "id": 10, "name": "Warehouse A" }] })).into_response()
}

async fn dashboard(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if let Some(rejection) = guard(&state, &headers) {
        return rejection;
    }
    Json(json!({ "data": { "totalItems": state.items.len() } })).into_response()
}

/// Start the service on an ephemeral port
pub async fn start_service() -> anyhow::Result<(SocketAddr, SharedState)> {
    let mut initial = ServiceState::default();
    for id in 1..=5u64 {
        initial.items.push(json!({ "id": id, "name": format!("Seed item {}", id), "categoryId": 1 }));
    }
    initial.next_id = 5;
    let state: SharedState = Arc::new(Mutex::new(initial));

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item))
        .route("/categories", get(categories))
        .route("/locations", get(locations))
        .route("/dashboard/stats", get(dashboard));
    let app = Router::new().nest("/api", api).with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((addr, state))
}

/// Short, fast-paced run against `addr`
pub fn test_config(addr: SocketAddr, agents: usize) -> StampedeConfig {
    let mut config = StampedeConfig::default();
    config.target.base_url = format!("http://{}", addr);
    config.target.admin_password = ADMIN_PASSWORD.to_string();
    config.target.agent_password = AGENT_PASSWORD.to_string();
    config.load.agent_count = agents;
    config.load.duration = Duration::from_secs(2);
    config.load.stagger = Duration::from_millis(50);
    config.load.pacing_min = Duration::from_millis(20);
    config.load.pacing_max = Duration::from_millis(40);
    config.load.live_interval = Duration::from_secs(1);
    config.load.seed = Some(2024);
    config.http.retry_delay = Duration::from_millis(10);
    config
}
