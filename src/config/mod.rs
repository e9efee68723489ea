// Configuration loading and management.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::schedule::{FixedDaytime, NightWindow, TieredDaytime, WeeklyWindow};

pub const PROD: &str = "prod";
pub const TEST: &str = "test";

pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_LIMIT: usize = 4;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PLANNER_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(300);
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Board {
    #[serde(rename = "homeboard")]
    pub homeboard: BoardBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub api: Option<Api>,
    pub schedule: Option<Schedule>,
    pub timetable: Option<TimetableSource>,
    pub transport: Option<Transport>,
    pub dinners: Option<Dinners>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub port: Option<String>,
    #[serde(rename = "static_dir")]
    pub static_dir: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

/// Refresh cadence. Every field falls back to the built-in schedule.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Schedule {
    #[serde(rename = "night_start", default, with = "hhmm")]
    pub night_start: Option<NaiveTime>,
    #[serde(rename = "day_start", default, with = "hhmm")]
    pub day_start: Option<NaiveTime>,
    #[serde(rename = "peak_end", default, with = "hhmm")]
    pub peak_end: Option<NaiveTime>,
    #[serde(rename = "window_close_hour")]
    pub window_close_hour: Option<u32>,
    #[serde(rename = "timetable_interval", default, with = "humantime_serde")]
    pub timetable_interval: Option<Duration>,
    #[serde(rename = "transport_peak_interval", default, with = "humantime_serde")]
    pub transport_peak_interval: Option<Duration>,
    #[serde(rename = "transport_offpeak_interval", default, with = "humantime_serde")]
    pub transport_offpeak_interval: Option<Duration>,
    #[serde(rename = "dinners_interval", default, with = "humantime_serde")]
    pub dinners_interval: Option<Duration>,
    #[serde(rename = "stats_interval", default, with = "humantime_serde")]
    pub stats_interval: Option<Duration>,
}

impl Schedule {
    pub fn night(&self) -> NightWindow {
        let default = NightWindow::default();
        NightWindow::new(
            self.night_start.unwrap_or(default.starts),
            self.day_start.unwrap_or(default.ends),
        )
    }

    pub fn timetable_policy(&self) -> FixedDaytime {
        let default = FixedDaytime::default();
        FixedDaytime {
            night: self.night(),
            interval: self.timetable_interval.unwrap_or(default.interval),
        }
    }

    pub fn transport_policy(&self) -> TieredDaytime {
        let default = TieredDaytime::default();
        TieredDaytime {
            night: self.night(),
            peak_ends: self.peak_end.unwrap_or(default.peak_ends),
            peak_interval: self.transport_peak_interval.unwrap_or(default.peak_interval),
            offpeak_interval: self.transport_offpeak_interval.unwrap_or(default.offpeak_interval),
        }
    }

    pub fn dinners_policy(&self) -> WeeklyWindow {
        let default = WeeklyWindow::default();
        WeeklyWindow {
            closes_at_hour: self.window_close_hour.unwrap_or(default.closes_at_hour),
            interval: self.dinners_interval.unwrap_or(default.interval),
        }
    }

    pub fn stats_interval(&self) -> Duration {
        self.stats_interval.unwrap_or(DEFAULT_STATS_INTERVAL)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableSource {
    pub url: String,
    pub user: String,
    #[serde(rename = "password_env")]
    pub password_env: String,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Transport {
    #[serde(rename = "dlr_url")]
    pub dlr_url: String,
    #[serde(rename = "rail_url")]
    pub rail_url: String,
    #[serde(rename = "london_bound", default)]
    pub london_bound: Vec<String>,
    pub limit: Option<usize>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dinners {
    #[serde(rename = "products_url")]
    pub products_url: String,
    #[serde(rename = "api_url")]
    pub api_url: Option<String>,
    #[serde(rename = "api_key_env")]
    pub api_key_env: String,
    pub model: Option<String>,
    #[serde(rename = "max_tokens")]
    pub max_tokens: Option<u32>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    fn api(&self) -> Option<&Api>;
    fn schedule(&self) -> Schedule;
    fn timetable(&self) -> Option<&TimetableSource>;
    fn transport(&self) -> Option<&Transport>;
    fn dinners(&self) -> Option<&Dinners>;
}

// Config type alias for convenience
pub type Config = Board;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.homeboard.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.homeboard.env == PROD
    }

    fn api(&self) -> Option<&Api> {
        self.homeboard.api.as_ref()
    }

    fn schedule(&self) -> Schedule {
        self.homeboard.schedule.clone().unwrap_or_default()
    }

    fn timetable(&self) -> Option<&TimetableSource> {
        self.homeboard.timetable.as_ref()
    }

    fn transport(&self) -> Option<&Transport> {
        self.homeboard.transport.as_ref()
    }

    fn dinners(&self) -> Option<&Dinners> {
        self.homeboard.dinners.as_ref()
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Resolve absolute path
        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::parse(&data).with_context(|| format!("unmarshal yaml from {:?}", abs_path))
    }

    /// Parses and validates a YAML document.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Board = serde_yaml::from_str(data)?;

        if let Some(hour) = cfg.homeboard.schedule.as_ref().and_then(|s| s.window_close_hour) {
            if hour > 24 {
                anyhow::bail!("schedule.window_close_hour must be within 0..=24, got {hour}");
            }
        }
        if let Some(transport) = cfg.transport() {
            if transport.limit == Some(0) {
                anyhow::bail!("transport.limit must be positive");
            }
        }

        Ok(cfg)
    }

    /// Port the read API listens on.
    pub fn port(&self) -> String {
        self.api()
            .and_then(|api| api.port.clone())
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
    }

    /// Directory holding the dashboard page.
    pub fn static_dir(&self) -> String {
        self.api()
            .and_then(|api| api.static_dir.clone())
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
    }
}

/// Reads a secret from the environment variable named in the config.
/// Empty values count as unset.
pub fn secret(env_name: &str) -> Option<String> {
    std::env::var(env_name).ok().filter(|v| !v.is_empty())
}

/// `"HH:MM"` times of day.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.collect_str(&t.format(FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| NaiveTime::parse_from_str(s.trim(), FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// Test config is always available for integration tests
mod test_config;
pub use test_config::new_test_config;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::hm;

    const YAML: &str = r#"
homeboard:
  env: dev
  logs:
    level: info
  api:
    name: homeboard
    port: "9090"
  schedule:
    night_start: "23:00"
    day_start: "06:30"
    transport_peak_interval: 5m
    dinners_interval: 30m
  timetable:
    url: http://bridge.local/api
    user: parent
    password_env: TIMETABLE_PASSWORD
  transport:
    dlr_url: https://api.tfl.gov.uk/StopPoint/940GZZDLPUD/Arrivals
    rail_url: https://transportapi.com/v3/uk/train/station/ZFD/live.json
    london_bound: [luton, bedford]
    timeout: 10s
"#;

    #[test]
    fn test_parse_sections_and_defaults() {
        let cfg = Config::parse(YAML).unwrap();
        assert!(!cfg.is_prod());
        assert_eq!(cfg.port(), "9090");
        assert_eq!(cfg.static_dir(), DEFAULT_STATIC_DIR);

        let schedule = cfg.schedule();
        assert_eq!(schedule.night(), NightWindow::new(hm(23, 0), hm(6, 30)));

        let transport = schedule.transport_policy();
        assert_eq!(transport.peak_interval, Duration::from_secs(300));
        assert_eq!(transport.offpeak_interval, Duration::from_secs(3600));
        assert_eq!(transport.peak_ends, hm(9, 0));

        assert_eq!(schedule.timetable_policy().interval, Duration::from_secs(3600));
        assert_eq!(schedule.dinners_policy().interval, Duration::from_secs(1800));
        assert_eq!(schedule.dinners_policy().closes_at_hour, 12);
        assert_eq!(schedule.stats_interval(), DEFAULT_STATS_INTERVAL);

        let transport = cfg.transport().unwrap();
        assert_eq!(transport.london_bound, vec!["luton", "bedford"]);
        assert_eq!(transport.timeout, Some(Duration::from_secs(10)));
        assert!(cfg.dinners().is_none());
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(Config::parse(&YAML.replace("\"23:00\"", "\"25:61\"")).is_err());
        let bad_limit = YAML.replace("    timeout: 10s", "    timeout: 10s\n    limit: 0");
        assert!(Config::parse(&bad_limit).is_err());
    }

    #[test]
    fn test_missing_schedule_uses_built_in_cadence() {
        let cfg = new_test_config();
        let schedule = Schedule::default();
        assert_eq!(schedule.night(), NightWindow::default());
        assert_eq!(cfg.homeboard.env, TEST);
        assert!(!cfg.is_prod());
    }

    #[test]
    fn test_shipped_config_parses() {
        let cfg = Config::parse(include_str!("../../cfg/homeboard.cfg.yaml")).unwrap();
        assert_eq!(cfg.port(), "8080");
        assert_eq!(cfg.schedule().transport_policy(), TieredDaytime::default());
        assert_eq!(cfg.transport().unwrap().london_bound.len(), 7);
        assert_eq!(cfg.dinners().unwrap().api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_secret_treats_empty_as_unset() {
        assert_eq!(secret("HOMEBOARD_SURELY_UNSET_VAR"), None);
    }
}
