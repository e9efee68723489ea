// Weekly meal plan payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day labels a generated plan must cover, in order.
pub const MEAL_DAYS: [&str; 4] = ["Lundi", "Mardi", "Mercredi", "Jeudi"];

/// Meal plan generated for one delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPlan {
    #[serde(serialize_with = "serialize_date")]
    pub week_of: NaiveDate,
    pub vegetables: Vec<String>,
    pub meals: Vec<Meal>,
}

/// One dinner suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub day: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uses: Vec<String>,
}

fn serialize_date<S: serde::Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format("%Y-%m-%d"))
}
