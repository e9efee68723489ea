use super::{Api, Board, BoardBox, Config, Logs, Schedule};
use std::time::Duration;

/// Creates a new test configuration. No source sections are set, so the
/// composition root starts no refresh loop unless a test adds one.
pub fn new_test_config() -> Config {
    Board {
        homeboard: BoardBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            api: Some(Api {
                name: Some("homeboard:8091".to_string()),
                port: Some("8091".to_string()),
                static_dir: Some("static".to_string()),
                timeout: Some(Duration::from_secs(5)),
            }),
            schedule: Some(Schedule {
                stats_interval: Some(Duration::from_secs(60)),
                ..Schedule::default()
            }),
            timetable: None,
            transport: None,
            dinners: None,
        },
    }
}
