//! Action catalogue: request building and learning from responses

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value as JsonValue};
use stampede_core::ActionKind;
use stampede_http::{ApiRequest, ApiResponse};
use std::collections::VecDeque;

const PAGE_SIZE: u32 = 20;
const MAX_PAGE: u32 = 5;

const SEARCH_TERMS: &[&str] = &[
    "bolt", "cable", "drill", "filter", "gasket", "hammer", "lamp", "pump", "sensor", "valve",
];

const ITEM_NOUNS: &[&str] = &[
    "Bracket", "Bearing", "Coupling", "Fuse", "Hinge", "Relay", "Spring", "Switch", "Washer",
];

const ITEM_ADJECTIVES: &[&str] = &["Compact", "Heavy", "Insulated", "Spare", "Standard", "Steel"];

/// Items in a list response, whether bare or wrapped in `data`/`items`
pub fn list_entries(body: &JsonValue) -> &[JsonValue] {
    let list = body
        .get("data")
        .or_else(|| body.get("items"))
        .unwrap_or(body);
    list.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// An entity id rendered for use in a path
pub fn entity_id(entity: &JsonValue) -> Option<String> {
    match entity.get("id")? {
        JsonValue::String(id) if !id.is_empty() => Some(id.clone()),
        JsonValue::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Reference data fetched once at setup, read-only afterwards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCache {
    categories: Vec<JsonValue>,
    locations: Vec<JsonValue>,
}

impl ReferenceCache {
    pub fn new(categories: Vec<JsonValue>, locations: Vec<JsonValue>) -> Self {
        Self { categories, locations }
    }

    /// Keep the ids of a list response
    pub fn ids_from(response: &ApiResponse) -> Vec<JsonValue> {
        list_entries(&response.body)
            .iter()
            .filter_map(|entry| entry.get("id").cloned())
            .filter(|id| !id.is_null())
            .collect()
    }

    pub fn set_categories(&mut self, ids: Vec<JsonValue>) {
        self.categories = ids;
    }

    pub fn set_locations(&mut self, ids: Vec<JsonValue>) {
        self.locations = ids;
    }

    pub fn categories(&self) -> &[JsonValue] {
        &self.categories
    }

    pub fn locations(&self) -> &[JsonValue] {
        &self.locations
    }

    /// Create payloads need at least one category
    pub fn can_create(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Most recently seen item ids, bounded
#[derive(Debug, Clone)]
pub struct KnownItems {
    ids: VecDeque<String>,
    limit: usize,
}

impl KnownItems {
    pub fn new(limit: usize) -> Self {
        Self {
            ids: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn remember(&mut self, id: String) {
        if self.ids.contains(&id) {
            return;
        }
        self.ids.push_back(id);
        while self.ids.len() > self.limit {
            self.ids.pop_front();
        }
    }

    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        if self.ids.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.ids.len());
        self.ids.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Learn ids from a successful response to `action`
    pub fn absorb(&mut self, action: ActionKind, response: &ApiResponse) {
        match action {
            ActionKind::ListItems | ActionKind::SearchItems => {
                for entry in list_entries(&response.body) {
                    if let Some(id) = entity_id(entry) {
                        self.remember(id);
                    }
                }
            }
            ActionKind::CreateItem => {
                let created = response.body.get("data").unwrap_or(&response.body);
                if let Some(id) = entity_id(created) {
                    self.remember(id);
                }
            }
            _ => {}
        }
    }
}

/// Build the request for `action`, or `None` when its preconditions are unmet
pub fn build_request<R: Rng>(
    action: ActionKind,
    rng: &mut R,
    known: &KnownItems,
    refs: &ReferenceCache,
) -> Option<ApiRequest> {
    let request = match action {
        ActionKind::ListItems => ApiRequest::get("/items")
            .query("page", rng.gen_range(1..=MAX_PAGE))
            .query("limit", PAGE_SIZE),
        ActionKind::SearchItems => ApiRequest::get("/items")
            .query("page", 1)
            .query("limit", PAGE_SIZE)
            .query("search", *SEARCH_TERMS.choose(rng)?),
        ActionKind::ViewItem => ApiRequest::get(format!("/items/{}", known.pick(rng)?)),
        ActionKind::CreateItem => ApiRequest::post("/items").json(item_payload(rng, refs)?),
        ActionKind::UpdateItem => {
            let id = known.pick(rng)?.to_string();
            ApiRequest::put(format!("/items/{}", id)).json(json!({
                "quantity": rng.gen_range(0..=500),
                "description": format!("Stock adjusted by load test ({})", rng.gen_range(1000..10000)),
            }))
        }
        ActionKind::ViewDashboard => ApiRequest::get("/dashboard/stats"),
        ActionKind::ViewProfile => ApiRequest::get("/auth/me"),
    };
    Some(request)
}

fn item_payload<R: Rng>(rng: &mut R, refs: &ReferenceCache) -> Option<JsonValue> {
    let category = refs.categories.choose(rng)?.clone();
    let name = format!(
        "{} {}",
        ITEM_ADJECTIVES.choose(rng)?,
        ITEM_NOUNS.choose(rng)?
    );

    let mut payload = json!({
        "name": name,
        "sku": format!("LT-{:08X}", rng.gen::<u32>()),
        "quantity": rng.gen_range(1..=250),
        "categoryId": category,
        "description": "Created by load test",
    });
    if let Some(location) = refs.locations.choose(rng) {
        payload["locationId"] = location.clone();
    }
    Some(payload)
}
