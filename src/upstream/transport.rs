//! Transit feeds: light-rail arrivals and mainline rail departures.
//!
//! Each feed is fetched, filtered and sorted on its own. A feed that fails is
//! logged and contributes an empty list, so the producer as a whole never
//! fails.

use serde::Deserialize;
use tracing::error;

use crate::http::client::JsonClient;
use crate::model::{Arrival, Departures, RailDeparture};
use crate::workers::Producer;

use super::ProducerError;

pub const DLR_MODE: &str = "dlr";
pub const INBOUND: &str = "inbound";
pub const UNKNOWN_DESTINATION: &str = "Unknown";

#[derive(Debug, Clone, Deserialize)]
pub struct TflArrival {
    #[serde(rename = "modeName")]
    pub mode_name: Option<String>,
    pub direction: Option<String>,
    #[serde(rename = "destinationName")]
    pub destination_name: Option<String>,
    #[serde(rename = "timeToStation")]
    pub time_to_station: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationBoard {
    pub departures: Option<BoardDepartures>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardDepartures {
    pub all: Option<Vec<RailRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RailRecord {
    pub destination_name: Option<String>,
    pub best_departure_estimate_mins: Option<i64>,
    pub status: Option<String>,
    pub operator_name: Option<String>,
}

/// Keeps inbound light-rail arrivals with a time to station, soonest first,
/// at most `limit`. Records of other modes are never inspected further.
pub fn select_arrivals(records: Vec<TflArrival>, limit: usize) -> Vec<Arrival> {
    let mut inbound: Vec<(f64, TflArrival)> = records
        .into_iter()
        .filter(|t| t.mode_name.as_deref() == Some(DLR_MODE) && t.direction.as_deref() == Some(INBOUND))
        .filter_map(|t| Some((t.time_to_station?, t)))
        .collect();
    inbound.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    inbound
        .into_iter()
        .take(limit)
        .map(|(secs, t)| Arrival {
            destination: t.destination_name.unwrap_or_else(|| UNKNOWN_DESTINATION.to_string()),
            mins: (secs / 60.0).round_ties_even() as i64,
        })
        .collect()
}

/// Whether a destination is on the allow-list ("london" always matches).
/// Case-insensitive substring match.
pub fn is_london_bound(destination: &str, allow: &[String]) -> bool {
    let d = destination.to_lowercase();
    d.contains("london") || allow.iter().any(|place| d.contains(&place.to_lowercase()))
}

/// Keeps allow-listed departures with an estimate, soonest first, at most `limit`.
pub fn select_departures(board: StationBoard, allow: &[String], limit: usize) -> Vec<RailDeparture> {
    let all = board.departures.and_then(|d| d.all).unwrap_or_default();

    let mut bound: Vec<(i64, RailRecord)> = all
        .into_iter()
        .filter_map(|t| {
            let mins = t.best_departure_estimate_mins?;
            let bound = is_london_bound(t.destination_name.as_deref().unwrap_or_default(), allow);
            if bound {
                Some((mins, t))
            } else {
                None
            }
        })
        .collect();
    bound.sort_by_key(|(mins, _)| *mins);

    bound
        .into_iter()
        .take(limit)
        .map(|(mins, t)| RailDeparture {
            destination: t.destination_name.unwrap_or_else(|| UNKNOWN_DESTINATION.to_string()),
            mins,
            status: t.status.unwrap_or_default(),
            operator: t.operator_name.unwrap_or_default(),
        })
        .collect()
}

/// Producer combining both feeds.
pub struct TransportProducer {
    client: JsonClient,
    dlr_url: String,
    rail_url: String,
    london_bound: Vec<String>,
    limit: usize,
}

impl TransportProducer {
    pub fn new(
        client: JsonClient,
        dlr_url: String,
        rail_url: String,
        london_bound: Vec<String>,
        limit: usize,
    ) -> Self {
        Self {
            client,
            dlr_url,
            rail_url,
            london_bound,
            limit,
        }
    }

    async fn arrivals(&self) -> Result<Vec<Arrival>, ProducerError> {
        let records: Vec<TflArrival> = self.client.get_json(&self.dlr_url, &[]).await?;
        Ok(select_arrivals(records, self.limit))
    }

    async fn departures(&self) -> Result<Vec<RailDeparture>, ProducerError> {
        let board: StationBoard = self.client.get_json(&self.rail_url, &[]).await?;
        Ok(select_departures(board, &self.london_bound, self.limit))
    }
}

#[async_trait::async_trait]
impl Producer for TransportProducer {
    type Output = Departures;

    async fn produce(&self) -> Result<Departures, ProducerError> {
        let (dlr, rail) = tokio::join!(self.arrivals(), self.departures());

        let dlr = dlr.unwrap_or_else(|e| {
            error!(component = "transport", feed = "dlr", error = %e, "feed failed, serving empty list");
            Vec::new()
        });
        let rail = rail.unwrap_or_else(|e| {
            error!(component = "transport", feed = "rail", error = %e, "feed failed, serving empty list");
            Vec::new()
        });

        Ok(Departures { dlr, rail })
    }
}
