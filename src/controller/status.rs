// Per-source status endpoint.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::http::Controller;
use crate::storage::{DinnersSlot, SlotStatus, TimetableSlot, TransportSlot};

pub const STATUS_PATH: &str = "/api/status";

#[derive(Debug, Serialize)]
pub struct BoardStatus {
    pub timetable: SlotStatus,
    pub trains: SlotStatus,
    pub dinners: SlotStatus,
}

/// StatusController reports each slot's state without its payload.
#[derive(Clone)]
pub struct StatusController {
    timetable: Arc<TimetableSlot>,
    trains: Arc<TransportSlot>,
    dinners: Arc<DinnersSlot>,
}

impl StatusController {
    pub fn new(timetable: Arc<TimetableSlot>, trains: Arc<TransportSlot>, dinners: Arc<DinnersSlot>) -> Self {
        Self {
            timetable,
            trains,
            dinners,
        }
    }

    fn status(&self) -> BoardStatus {
        BoardStatus {
            timetable: self.timetable.read().status(),
            trains: self.trains.read().status(),
            dinners: self.dinners.read().status(),
        }
    }
}

impl Controller for StatusController {
    fn add_route(&self, router: Router) -> Router {
        let controller = self.clone();
        router.route(
            STATUS_PATH,
            get(move || {
                let controller = controller.clone();
                async move { Json(controller.status()) }
            }),
        )
    }
}
