//! Rolling-window aggregation
//!
//! Selects the entries of the trailing window relative to a reference instant
//! and derives the statistics the risk scorer consumes.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::config::ScoringConfig;
use crate::types::{Entry, WindowStats};

/// Entries of the trailing window plus today's entry, if any
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Entries within the window, in history order
    pub entries: Vec<&'a Entry>,
    /// Entry dated exactly on the reference day
    pub today: Option<&'a Entry>,
    pub stats: WindowStats,
}

/// Aggregator over a history slice
#[derive(Debug, Clone)]
pub struct Aggregator {
    window_days: u32,
    low_sleep_max: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl Aggregator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            window_days: config.window_days,
            low_sleep_max: config.low_sleep_max,
        }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Compute the window ending at `now`.
    ///
    /// An entry belongs to the window when `now - date <= window_days * 24h`,
    /// with the date taken as UTC midnight. Future-dated entries have a
    /// negative age and are therefore included.
    pub fn window<'a>(&self, entries: &'a [Entry], now: DateTime<Utc>) -> Window<'a> {
        let today_date = now.date_naive();

        let in_window: Vec<&Entry> = entries
            .iter()
            .filter(|e| within_days(e.date, now, self.window_days))
            .collect();
        let today = entries.iter().find(|e| e.date == today_date);
        let stats = self.stats(&in_window);

        Window {
            entries: in_window,
            today,
            stats,
        }
    }

    /// Statistics over an already-selected window
    pub fn stats(&self, window: &[&Entry]) -> WindowStats {
        if window.is_empty() {
            return WindowStats::empty();
        }

        let n = window.len() as f64;

        let sensitivity_sum: f64 = window.iter().map(|e| e.sensitivity.total()).sum();
        let average_sensitivity = sensitivity_sum / (4.0 * n);

        let low_sleep_days = window
            .iter()
            .filter(|e| e.sleep <= self.low_sleep_max)
            .count() as u32;

        let draining_interactions = window.iter().filter(|e| e.social.is_draining()).count() as u32;

        let mood_sum: f64 = window.iter().map(|e| e.mood).sum();

        WindowStats {
            window_size: window.len(),
            average_sensitivity: Some(average_sensitivity),
            low_sleep_days,
            draining_interactions,
            average_mood: Some(round_to_tenth(mood_sum / n)),
        }
    }
}

/// Whether `date` (as UTC midnight) is at most `days * 24h` before `now`
pub fn within_days(date: NaiveDate, now: DateTime<Utc>, days: u32) -> bool {
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    now.signed_duration_since(start) <= Duration::days(i64::from(days))
}

/// Round half away from zero to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
