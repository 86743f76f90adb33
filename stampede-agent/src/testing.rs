//! In-memory fake of the target service
//!
//! [`FakeTarget`] implements [`HttpClient`] without any networking. It
//! issues and checks tokens like the real service and answers the item,
//! reference and dashboard routes with small canned bodies. Tests script
//! failures by queueing statuses or transport faults.
//!
//! ```toml
//! [dev-dependencies]
//! stampede-agent = { features = ["testing"] }
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value as JsonValue};
use stampede_http::{ApiRequest, ApiResponse, HttpClient, HttpError, HttpMethod};
use std::collections::{HashSet, VecDeque};

#[derive(Debug)]
enum Scripted {
    Status(u16),
    Fault(HttpError),
}

#[derive(Debug)]
struct FakeState {
    issued: u64,
    access_tokens: HashSet<String>,
    refresh_tokens: HashSet<String>,
    login_status: u16,
    refresh_status: u16,
    default_status: u16,
    script: VecDeque<Scripted>,
    auth_faults: VecDeque<HttpError>,
    requests: Vec<ApiRequest>,
    items: Vec<u64>,
    next_item_id: u64,
}

/// Scriptable fake target service
#[derive(Debug)]
pub struct FakeTarget {
    state: Mutex<FakeState>,
}

impl Default for FakeTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTarget {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                issued: 0,
                access_tokens: HashSet::new(),
                refresh_tokens: HashSet::new(),
                login_status: 200,
                refresh_status: 200,
                default_status: 200,
                script: VecDeque::new(),
                auth_faults: VecDeque::new(),
                requests: Vec::new(),
                items: (1..=5).collect(),
                next_item_id: 6,
            }),
        }
    }

    /// Status answered to every login from now on
    pub fn set_login_status(&self, status: u16) {
        self.state.lock().login_status = status;
    }

    pub fn set_refresh_status(&self, status: u16) {
        self.state.lock().refresh_status = status;
    }

    /// Status for non-auth requests once the script is empty
    pub fn set_default_status(&self, status: u16) {
        self.state.lock().default_status = status;
    }

    /// Queue a status for the next non-auth request
    pub fn push_status(&self, status: u16) {
        self.state.lock().script.push_back(Scripted::Status(status));
    }

    pub fn push_statuses(&self, statuses: impl IntoIterator<Item = u16>) {
        let mut state = self.state.lock();
        state.script.extend(statuses.into_iter().map(Scripted::Status));
    }

    /// Queue a transport fault for the next non-auth request
    pub fn push_fault(&self, fault: HttpError) {
        self.state.lock().script.push_back(Scripted::Fault(fault));
    }

    /// Queue a transport fault for the next login, refresh or logout
    pub fn push_auth_fault(&self, fault: HttpError) {
        self.state.lock().auth_faults.push_back(fault);
    }

    /// Invalidate every issued access token; refresh tokens stay valid
    pub fn revoke_access(&self) {
        self.state.lock().access_tokens.clear();
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().requests.clone()
    }

    /// Requests seen for `method` and exact `path`
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method.as_str() == method && r.path == path)
            .count()
    }

    pub fn item_count(&self) -> usize {
        self.state.lock().items.len()
    }
}

impl FakeState {
    fn issue_tokens(&mut self) -> ApiResponse {
        self.issued += 1;
        let access = format!("access-{}", self.issued);
        let refresh = format!("refresh-{}", self.issued);
        self.access_tokens.insert(access.clone());
        self.refresh_tokens.insert(refresh.clone());
        ApiResponse::new(200, json!({ "accessToken": access, "refreshToken": refresh }))
    }

    fn authenticate(&mut self, request: &ApiRequest) -> Result<ApiResponse, HttpError> {
        if let Some(fault) = self.auth_faults.pop_front() {
            return Err(fault);
        }

        let body = request.body.clone().unwrap_or(JsonValue::Null);
        let response = match request.path.as_str() {
            "/auth/login" if self.login_status == 200 => self.issue_tokens(),
            "/auth/login" => error(self.login_status, "Invalid credentials"),
            "/auth/refresh" => {
                let token = body["refreshToken"].as_str().unwrap_or_default().to_string();
                if self.refresh_status == 200 && self.refresh_tokens.remove(&token) {
                    self.issue_tokens()
                } else {
                    error(401, "Invalid refresh token")
                }
            }
            _ => {
                if let Some(token) = &request.bearer {
                    self.access_tokens.remove(token);
                }
                if let Some(token) = body["refreshToken"].as_str() {
                    self.refresh_tokens.remove(token);
                }
                ApiResponse::new(204, JsonValue::Null)
            }
        };
        Ok(response)
    }

    fn route(&mut self, request: &ApiRequest) -> ApiResponse {
        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        match (request.method, segments.as_slice()) {
            (HttpMethod::Get, ["items"]) => {
                let data: Vec<JsonValue> = self.items.iter().rev().take(20).map(|id| json!({ "id": id })).collect();
                ApiResponse::new(200, json!({ "data": data, "total": self.items.len(), "page": 1 }))
            }
            (HttpMethod::Get, ["items", id]) | (HttpMethod::Put, ["items", id]) => {
                ApiResponse::new(200, json!({ "id": id }))
            }
            (HttpMethod::Post, ["items"]) => {
                let id = self.next_item_id;
                self.next_item_id += 1;
                self.items.push(id);
                ApiResponse::new(201, json!({ "id": id }))
            }
            (HttpMethod::Get, ["categories"]) => ApiResponse::new(
                200,
                json!({ "data": [{ "id": 1, "name": "Tools" }, { "id": 2, "name": "Parts" }] }),
            ),
            (HttpMethod::Get, ["locations"]) => {
                ApiResponse::new(200, json!({ "data": [{ "id": 10, "name": "Aisle 1" }] }))
            }
            (HttpMethod::Get, ["dashboard", "stats"]) => {
                ApiResponse::new(200, json!({ "totalItems": self.items.len() }))
            }
            (HttpMethod::Get, ["auth", "me"]) => ApiResponse::new(200, json!({ "id": 1, "role": "standard" })),
            _ => error(404, "Not found"),
        }
    }
}

fn error(status: u16, message: &str) -> ApiResponse {
    ApiResponse::new(status, json!({ "error": message }))
}

fn is_auth_call(request: &ApiRequest) -> bool {
    request.method == HttpMethod::Post
        && matches!(request.path.as_str(), "/auth/login" | "/auth/refresh" | "/auth/logout")
}

#[async_trait]
impl HttpClient for FakeTarget {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HttpError> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());

        if is_auth_call(request) {
            return state.authenticate(request);
        }

        let authorized = request
            .bearer
            .as_ref()
            .is_some_and(|token| state.access_tokens.contains(token));
        if !authorized {
            return Ok(error(401, "Unauthorized"));
        }

        let status = match state.script.pop_front() {
            Some(Scripted::Fault(fault)) => return Err(fault),
            Some(Scripted::Status(status)) => status,
            None => state.default_status,
        };
        if !(200..300).contains(&status) {
            return Ok(error(status, &format!("Scripted failure {}", status)));
        }

        Ok(state.route(request))
    }
}
