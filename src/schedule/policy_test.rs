#[cfg(test)]
mod tests {
    use crate::model::WeekId;
    use crate::schedule::{FixedDaytime, NightWindow, Policy, TieredDaytime, WeeklyWindow};
    use crate::time::hm;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::time::Duration;

    // 2024-03-04 is a Monday.
    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn mins(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn test_night_window_boundaries() {
        let night = NightWindow::default();
        assert!(!night.contains(hm(21, 59)));
        assert!(night.contains(hm(22, 0)));
        assert!(night.contains(hm(0, 0)));
        assert!(night.contains(hm(7, 14)));
        assert!(!night.contains(hm(7, 15)));
        assert!(!night.contains(hm(12, 0)));
    }

    #[test]
    fn test_non_wrapping_window() {
        let window = NightWindow::new(hm(1, 0), hm(5, 0));
        assert!(!window.contains(hm(0, 59)));
        assert!(window.contains(hm(1, 0)));
        assert!(!window.contains(hm(5, 0)));
    }

    #[test]
    fn test_until_wake_same_day() {
        let night = NightWindow::default();
        assert_eq!(night.until_wake(at(5, 6, 0)), mins(75));
    }

    #[test]
    fn test_until_wake_rolls_over_to_next_day() {
        let night = NightWindow::default();
        // 08:00 -> 07:15 tomorrow
        assert_eq!(night.until_wake(at(5, 8, 0)), mins(23 * 60 + 15));
        // 23:00 -> 07:15 tomorrow
        assert_eq!(night.until_wake(at(5, 23, 0)), mins(8 * 60 + 15));
        // exactly 07:15 is not in the future
        assert_eq!(night.until_wake(at(5, 7, 15)), mins(24 * 60));
    }

    #[test]
    fn test_until_wake_keeps_seconds() {
        let night = NightWindow::default();
        let now = at(5, 7, 14) + chrono::Duration::seconds(30);
        assert_eq!(night.until_wake(now), Duration::from_secs(30));
    }

    #[test]
    fn test_fixed_daytime() {
        let policy = FixedDaytime::default();

        let day = policy.decide(at(5, 12, 0), None);
        assert!(day.should_run);
        assert_eq!(day.next_check_delay, Duration::from_secs(3600));

        let night = policy.decide(at(5, 22, 0), None);
        assert!(!night.should_run);
        assert_eq!(night.next_check_delay, mins(9 * 60 + 15));
        assert_eq!(night.mark, None);
    }

    #[test]
    fn test_tiered_cadence() {
        let policy = TieredDaytime::default();

        let peak = policy.decide(at(5, 8, 30), None);
        assert!(peak.should_run);
        assert_eq!(peak.next_check_delay, Duration::from_secs(600));

        let edge = policy.decide(at(5, 7, 15), None);
        assert!(edge.should_run);
        assert_eq!(edge.next_check_delay, Duration::from_secs(600));

        let offpeak = policy.decide(at(5, 12, 0), None);
        assert!(offpeak.should_run);
        assert_eq!(offpeak.next_check_delay, Duration::from_secs(3600));

        let nine = policy.decide(at(5, 9, 0), None);
        assert_eq!(nine.next_check_delay, Duration::from_secs(3600));

        let night = policy.decide(at(5, 23, 0), None);
        assert!(!night.should_run);
        assert_eq!(night.next_check_delay, NightWindow::default().until_wake(at(5, 23, 0)));
    }

    #[test]
    fn test_weekly_window_open_days() {
        let policy = WeeklyWindow::default();
        assert!(policy.is_open(at(9, 10, 0))); // Saturday
        assert!(policy.is_open(at(10, 23, 0))); // Sunday
        assert!(policy.is_open(at(11, 11, 59))); // Monday morning
        assert!(!policy.is_open(at(11, 12, 0))); // Monday noon
        assert!(!policy.is_open(at(6, 10, 0))); // Wednesday
        assert!(!policy.is_open(at(8, 20, 0))); // Friday
    }

    #[test]
    fn test_weekly_skips_when_marker_is_current_week() {
        let policy = WeeklyWindow::default();
        for day in 4..=10 {
            let now = at(day, 10, 0);
            let marker = WeekId::of(now.date());
            let decision = policy.decide(now, Some(&marker));
            assert!(!decision.should_run, "day {day} should not run");
            assert_eq!(decision.next_check_delay, Duration::from_secs(3600));
        }
    }

    #[test]
    fn test_weekly_runs_on_sunday_with_old_marker() {
        let policy = WeeklyWindow::default();
        let sunday = at(10, 9, 0);
        let last_week = WeekId::of(at(1, 9, 0).date());

        let decision = policy.decide(sunday, Some(&last_week));
        assert!(decision.should_run);
        assert_eq!(decision.mark, Some(WeekId::of(sunday.date())));
        assert_eq!(decision.mark.unwrap().monday(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());

        assert!(policy.decide(sunday, None).should_run);
    }

    #[test]
    fn test_weekly_never_runs_midweek() {
        let policy = WeeklyWindow::default();
        let wednesday = at(6, 10, 0);
        let last_week = WeekId::of(at(1, 9, 0).date());
        assert!(!policy.decide(wednesday, None).should_run);
        assert!(!policy.decide(wednesday, Some(&last_week)).should_run);
    }

    #[test]
    fn test_weekly_checks_at_night_too() {
        let policy = WeeklyWindow::default();
        let saturday_night = at(9, 23, 30);
        let decision = policy.decide(saturday_night, None);
        assert!(decision.should_run);
        assert_eq!(decision.next_check_delay, Duration::from_secs(3600));
    }
}
