//! School timetable producer.
//!
//! Talks to the timetable provider through [`TimetableSource`] and shapes the
//! raw lessons and homework into per-child, per-day views for the dashboard.

use base64::Engine;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;
use url::Url;

use crate::http::client::JsonClient;
use crate::model::{format_date_fr, Child, Day, Homework, HomeworkDay, Lesson, Timetable};
use crate::time::Clock;
use crate::workers::Producer;

use super::ProducerError;

/// How far ahead homework is collected.
pub const HOMEWORK_HORIZON_DAYS: u64 = 7;

#[derive(Debug, Clone, Deserialize)]
pub struct Pupil {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLesson {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub subject: Option<String>,
    #[serde(default)]
    pub canceled: bool,
    pub status: Option<String>,
    pub teacher_name: Option<String>,
    pub classroom: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHomework {
    pub date: NaiveDate,
    pub subject: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub done: bool,
}

/// Timetable provider.
#[async_trait::async_trait]
pub trait TimetableSource: Send + Sync {
    async fn children(&self) -> Result<Vec<Pupil>, ProducerError>;

    async fn lessons(
        &self,
        pupil: &Pupil,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawLesson>, ProducerError>;

    async fn homework(
        &self,
        pupil: &Pupil,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawHomework>, ProducerError>;
}

/// Reads the provider through a JSON bridge authenticated with basic auth:
/// `GET {base}/children`, `GET {base}/children/{id}/lessons?from=&to=` and
/// `GET {base}/children/{id}/homework?from=&to=`.
pub struct HttpTimetableSource {
    client: JsonClient,
    base: Url,
    user: String,
    password: Option<String>,
}

impl HttpTimetableSource {
    pub fn new(
        client: JsonClient,
        base: &str,
        user: String,
        password: Option<String>,
    ) -> Result<Self, ProducerError> {
        let mut base = Url::parse(base)
            .map_err(|e| ProducerError::Config(format!("timetable url {base:?}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            base,
            user,
            password,
        })
    }

    fn authorization(&self) -> Result<String, ProducerError> {
        let password = self
            .password
            .as_deref()
            .ok_or_else(|| ProducerError::Config("timetable password is not set".to_string()))?;
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.user, password));
        Ok(format!("Basic {token}"))
    }

    /// Appends `segments` to the base path, each escaped as a single segment.
    fn url(&self, segments: &[&str], range: Option<(NaiveDate, NaiveDate)>) -> Result<Url, ProducerError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProducerError::Config(format!("timetable url {} cannot have a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        if let Some((from, to)) = range {
            url.query_pairs_mut()
                .append_pair("from", &from.format("%Y-%m-%d").to_string())
                .append_pair("to", &to.format("%Y-%m-%d").to_string());
        }
        Ok(url)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ProducerError> {
        let auth = self.authorization()?;
        self.client
            .get_json(url.as_str(), &[("authorization", auth.as_str()), ("accept", "application/json")])
            .await
    }
}

#[async_trait::async_trait]
impl TimetableSource for HttpTimetableSource {
    async fn children(&self) -> Result<Vec<Pupil>, ProducerError> {
        self.fetch(self.url(&["children"], None)?).await
    }

    async fn lessons(
        &self,
        pupil: &Pupil,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawLesson>, ProducerError> {
        let segments = ["children", pupil.id.as_str(), "lessons"];
        self.fetch(self.url(&segments, Some((from, to)))?).await
    }

    async fn homework(
        &self,
        pupil: &Pupil,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawHomework>, ProducerError> {
        let segments = ["children", pupil.id.as_str(), "homework"];
        self.fetch(self.url(&segments, Some((from, to)))?).await
    }
}

/// School days to show: today through Friday on a weekday, next Monday
/// through Friday on a weekend.
pub fn target_dates(today: NaiveDate) -> Vec<NaiveDate> {
    let weekday = today.weekday().num_days_from_monday() as u64;
    let (start, count) = match today.weekday() {
        Weekday::Sat | Weekday::Sun => (today + Days::new(7 - weekday), 5),
        _ => (today, 5 - weekday),
    };
    (0..count).map(|i| start + Days::new(i)).collect()
}

/// Last word of the full name with the first letter upper-cased and the rest
/// lower-cased.
pub fn display_name(full: &str) -> String {
    let last = full.split_whitespace().last().unwrap_or_default();
    let mut chars = last.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn minutes_of_day(t: NaiveDateTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Groups lessons onto the target dates, each day's lessons in start order.
pub fn build_days(dates: &[NaiveDate], today: NaiveDate, mut lessons: Vec<RawLesson>) -> Vec<Day> {
    lessons.sort_by_key(|l| l.start);

    let mut by_date: BTreeMap<NaiveDate, Vec<Lesson>> = BTreeMap::new();
    for l in lessons {
        by_date.entry(l.start.date()).or_default().push(Lesson {
            start: l.start.format("%H:%M").to_string(),
            end: l.end.format("%H:%M").to_string(),
            start_mins: minutes_of_day(l.start),
            end_mins: minutes_of_day(l.end),
            subject: l.subject.unwrap_or_else(|| "?".to_string()),
            cancelled: l.canceled,
            status: l.status.unwrap_or_default(),
            teacher: l.teacher_name.unwrap_or_default(),
            room: l.classroom.unwrap_or_default(),
        });
    }

    dates
        .iter()
        .map(|d| Day {
            date_label: d.format("%-d %B").to_string(),
            date_fr: format_date_fr(*d),
            weekday: d.format("%A").to_string(),
            is_today: *d == today,
            lessons: by_date.remove(d).unwrap_or_default(),
        })
        .collect()
}

/// Drops finished homework and groups the rest by due date, earliest first.
pub fn group_homework(items: Vec<RawHomework>) -> Vec<HomeworkDay> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Homework>> = BTreeMap::new();
    for hw in items.into_iter().filter(|hw| !hw.done) {
        by_date.entry(hw.date).or_default().push(Homework {
            subject: hw.subject.unwrap_or_else(|| "?".to_string()),
            description: hw.description.unwrap_or_default(),
        });
    }
    by_date
        .into_iter()
        .map(|(date, items)| HomeworkDay {
            date_fr: format_date_fr(date),
            items,
        })
        .collect()
}

/// Producer building the per-child timetable.
pub struct TimetableProducer<S> {
    source: S,
    clock: Arc<dyn Clock>,
}

impl<S: TimetableSource> TimetableProducer<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }
}

#[async_trait::async_trait]
impl<S: TimetableSource> Producer for TimetableProducer<S> {
    type Output = Timetable;

    async fn produce(&self) -> Result<Timetable, ProducerError> {
        let today = self.clock.now().date();
        let dates = target_dates(today);
        let (first, last) = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(Timetable::default()),
        };
        let homework_until = today + Days::new(HOMEWORK_HORIZON_DAYS);

        let mut children = Vec::new();
        for pupil in self.source.children().await? {
            let lessons = self.source.lessons(&pupil, first, last).await?;
            let days = build_days(&dates, today, lessons);

            let homework = match self.source.homework(&pupil, today, homework_until).await {
                Ok(items) => group_homework(items),
                Err(e) => {
                    warn!(
                        component = "timetable",
                        child = %pupil.name,
                        error = %e,
                        "homework unavailable, continuing without it"
                    );
                    Vec::new()
                }
            };

            children.push(Child {
                name: display_name(&pupil.name),
                days,
                homework,
            });
        }

        Ok(Timetable { children })
    }
}
