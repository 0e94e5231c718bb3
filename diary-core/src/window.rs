//! Time window for selecting events.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::{DiaryError, DiaryResult};

/// Days fetched on each side of today when no bounds are given
pub const DEFAULT_WINDOW_DAYS: i64 = 31;

/// Events overlapping `[from, to]` are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn around(now: DateTime<Utc>, days: i64) -> Self {
        TimeWindow {
            from: now - Duration::days(days),
            to: now + Duration::days(days),
        }
    }

    /// Build a window from optional YYYY-MM-DD bounds; a missing bound is
    /// `days` away from `now`.
    pub fn from_args(
        now: DateTime<Utc>,
        from: Option<&str>,
        to: Option<&str>,
        days: i64,
    ) -> DiaryResult<Self> {
        if days < 0 {
            return Err(DiaryError::Config(format!(
                "Window size must not be negative, got {} days",
                days
            )));
        }

        let fallback = TimeWindow::around(now, days);
        let from = match from {
            Some(s) => parse_day(s)?.and_time(NaiveTime::MIN).and_utc(),
            None => fallback.from,
        };
        let to = match to {
            Some(s) => end_of_day(parse_day(s)?),
            None => fallback.to,
        };

        if from > to {
            return Err(DiaryError::Config(format!(
                "Window start {} is after window end {}",
                from.format("%Y-%m-%d"),
                to.format("%Y-%m-%d")
            )));
        }

        Ok(TimeWindow { from, to })
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}

fn parse_day(s: &str) -> DiaryResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        DiaryError::Config(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::seconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_around() {
        let window = TimeWindow::around(now(), 31);
        assert_eq!(window.from, Utc.with_ymd_and_hms(2024, 2, 13, 12, 0, 0).unwrap());
        assert_eq!(window.to, Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_from_args_explicit_bounds() {
        let window = TimeWindow::from_args(now(), Some("2024-01-01"), Some("2024-01-31"), 31).unwrap();
        assert_eq!(window.from_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(window.to_rfc3339(), "2024-01-31T23:59:59+00:00");
    }

    #[test]
    fn test_from_args_falls_back_to_days() {
        let window = TimeWindow::from_args(now(), None, Some("2024-03-20"), 7).unwrap();
        assert_eq!(window.from, Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_from_args_rejects_bad_input() {
        assert!(TimeWindow::from_args(now(), Some("03/01/2024"), None, 31).is_err());
        assert!(TimeWindow::from_args(now(), Some("2024-02-01"), Some("2024-01-01"), 31).is_err());
        assert!(TimeWindow::from_args(now(), None, None, -1).is_err());
    }
}
