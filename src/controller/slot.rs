// Read endpoints serving one cache slot each.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::http::Controller;
use crate::storage::{CacheSlot, DinnersSlot, Snapshot, TimetableSlot, TransportSlot};

pub const TIMETABLE_PATH: &str = "/api/timetable";
pub const TRAINS_PATH: &str = "/api/trains";
pub const DINNERS_PATH: &str = "/api/dinners";

pub const LOADING: &str = "Loading…";
pub const DINNERS_WAITING: &str = "En attente du prochain week-end…";

/// Renders a snapshot.
///
/// No payload yet: 503 with the last error, or `placeholder` when nothing has
/// failed either. Otherwise 200 with the payload's fields plus `cached_at`, and
/// `last_error` when the payload is stale.
pub fn render<T: Serialize, M>(snapshot: &Snapshot<T, M>, placeholder: &str) -> Response {
    let Some(payload) = snapshot.payload.as_ref() else {
        let message = snapshot.last_error.as_deref().unwrap_or(placeholder);
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": message }))).into_response();
    };

    let mut body = match serde_json::to_value(payload.as_ref()) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            let mut fields = Map::new();
            fields.insert("data".to_string(), other);
            fields
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("failed to encode payload: {e}") })),
            )
                .into_response();
        }
    };

    body.insert("cached_at".to_string(), json!(snapshot.captured_at_hhmm()));
    if let Some(err) = &snapshot.last_error {
        body.insert("last_error".to_string(), json!(err));
    }

    (StatusCode::OK, Json(Value::Object(body))).into_response()
}

/// SlotController exposes one slot under one path. Handlers only read.
pub struct SlotController<T, M = ()> {
    path: &'static str,
    slot: Arc<CacheSlot<T, M>>,
    placeholder: &'static str,
}

impl<T, M> SlotController<T, M> {
    pub fn new(path: &'static str, slot: Arc<CacheSlot<T, M>>, placeholder: &'static str) -> Self {
        Self {
            path,
            slot,
            placeholder,
        }
    }
}

impl SlotController<crate::model::Timetable> {
    pub fn timetable(slot: Arc<TimetableSlot>) -> Self {
        Self::new(TIMETABLE_PATH, slot, LOADING)
    }
}

impl SlotController<crate::model::Departures> {
    pub fn trains(slot: Arc<TransportSlot>) -> Self {
        Self::new(TRAINS_PATH, slot, LOADING)
    }
}

impl SlotController<crate::model::WeeklyPlan, crate::model::WeekId> {
    pub fn dinners(slot: Arc<DinnersSlot>) -> Self {
        Self::new(DINNERS_PATH, slot, DINNERS_WAITING)
    }
}

impl<T, M> Controller for SlotController<T, M>
where
    T: Serialize + Send + Sync + 'static,
    M: Clone + Send + Sync + 'static,
{
    fn add_route(&self, router: Router) -> Router {
        let slot = self.slot.clone();
        let placeholder = self.placeholder;
        router.route(
            self.path,
            get(move || {
                let slot = slot.clone();
                async move { render(&slot.read(), placeholder) }
            }),
        )
    }
}
