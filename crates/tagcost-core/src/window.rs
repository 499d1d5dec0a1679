//! Poll window construction
//!
//! Each scrape queries one half-open hourly interval `[start, end)` in UTC:
//! `start` is the top of the current day and `end` the top of the current
//! hour. Cost Explorer expects both bounds as ISO-8601 strings with zeroed
//! minutes and seconds.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Bound format sent to the billing API
const BOUND_FORMAT: &str = "%Y-%m-%dT%H:00:00Z";

/// Half-open hourly interval `[start, end)` in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollWindow {
    /// Start of the current calendar day
    pub start: DateTime<Utc>,
    /// Start of the current hour
    pub end: DateTime<Utc>,
}

impl PollWindow {
    /// Build the window for an explicit instant
    pub fn for_instant(now: DateTime<Utc>) -> Self {
        let date = now.date_naive();
        // Midnight and the top of any valid hour always exist in UTC
        let start = date.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc();
        let end = date
            .and_hms_opt(now.hour(), 0, 0)
            .expect("hour start exists")
            .and_utc();
        Self { start, end }
    }

    /// Build the window for the current instant
    pub fn current() -> Self {
        Self::for_instant(Utc::now())
    }

    /// Window start as the API bound string
    pub fn start_bound(&self) -> String {
        self.start.format(BOUND_FORMAT).to_string()
    }

    /// Window end as the API bound string
    pub fn end_bound(&self) -> String {
        self.end.format(BOUND_FORMAT).to_string()
    }

    /// True within the first hour of a day, where `start == end`
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_truncation() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 5, 42, 10).unwrap();
        let window = PollWindow::for_instant(now);
        assert_eq!(window.start_bound(), "2024-03-01T00:00:00Z");
        assert_eq!(window.end_bound(), "2024-03-01T05:00:00Z");
        assert!(window.start <= window.end);
    }

    #[test]
    fn test_window_at_midnight_is_degenerate() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let window = PollWindow::for_instant(now);
        assert!(window.is_degenerate());
        assert_eq!(window.start_bound(), window.end_bound());
    }

    #[test]
    fn test_window_drops_sub_hour_precision() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let window = PollWindow::for_instant(now);
        assert_eq!(window.start_bound(), "2024-12-31T00:00:00Z");
        assert_eq!(window.end_bound(), "2024-12-31T23:00:00Z");
    }
}
