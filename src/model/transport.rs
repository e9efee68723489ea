// Transit departures payload.

use serde::Serialize;

/// Next departures from both feeds. A feed that failed contributes an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Departures {
    pub dlr: Vec<Arrival>,
    pub rail: Vec<RailDeparture>,
}

/// Light-rail arrival, minutes rounded to the nearest whole minute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    pub destination: String,
    pub mins: i64,
}

/// Mainline rail departure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RailDeparture {
    pub destination: String,
    pub mins: i64,
    pub status: String,
    pub operator: String,
}
