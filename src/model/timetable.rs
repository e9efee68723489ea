// School timetable payload.

use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

const DAYS_FR: [&str; 7] = ["Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche"];
const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jun", "Jul", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Lessons and homework for every child on the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timetable {
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Child {
    pub name: String,
    pub days: Vec<Day>,
    /// Pending homework keyed by French date label, earliest first.
    #[serde(serialize_with = "serialize_homework")]
    pub homework: Vec<HomeworkDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Day {
    pub date_label: String,
    pub date_fr: String,
    pub weekday: String,
    pub is_today: bool,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lesson {
    pub start: String,
    pub end: String,
    pub start_mins: u32,
    pub end_mins: u32,
    pub subject: String,
    pub cancelled: bool,
    pub status: String,
    pub teacher: String,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkDay {
    pub date_fr: String,
    pub items: Vec<Homework>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Homework {
    pub subject: String,
    pub description: String,
}

/// Formats a date as e.g. "Lundi 4 Mar".
pub fn format_date_fr(d: NaiveDate) -> String {
    format!(
        "{} {} {}",
        DAYS_FR[d.weekday().num_days_from_monday() as usize],
        d.day(),
        MONTHS_FR[d.month0() as usize]
    )
}

fn serialize_homework<S: Serializer>(days: &[HomeworkDay], s: S) -> Result<S::Ok, S::Error> {
    let mut map = s.serialize_map(Some(days.len()))?;
    for day in days {
        map.serialize_entry(&day.date_fr, &day.items)?;
    }
    map.end()
}
