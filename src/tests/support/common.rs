// Time and request helpers.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// 2024-03-04 is a Monday.
pub const MONDAY: (i32, u32, u32) = (2024, 3, 4);

/// Local date-time `days` after [`MONDAY`], at `h:m`.
pub fn week_day_at(days: u64, h: u32, m: u32) -> NaiveDateTime {
    let (y, mo, d) = MONDAY;
    let monday = NaiveDate::from_ymd_opt(y, mo, d).unwrap();
    (monday + chrono::Days::new(days)).and_hms_opt(h, m, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Sends a GET through the router and returns the status and raw body.
pub async fn get(router: &Router, path: &str) -> (StatusCode, Vec<u8>) {
    let resp = router
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

/// Sends a GET through the router and decodes the JSON body.
pub async fn get_json(router: &Router, path: &str) -> (StatusCode, Value) {
    let (status, body) = get(router, path).await;
    (status, serde_json::from_slice(&body).unwrap())
}
