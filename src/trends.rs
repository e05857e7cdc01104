//! Per-day trend series
//!
//! Date-ordered mood and mean sensitivity, one point per entry.

use crate::types::{Entry, TrendPoint};

/// Build the trend series sorted by ascending date
pub fn trend_series(entries: &[Entry]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| TrendPoint {
            date: e.date,
            mood: e.mood,
            sensitivity: e.sensitivity.mean(),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawEntry;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_series_is_date_ordered() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let make = |date: &str, mood: i64, sound: i64| {
            let raw = RawEntry {
                date: Some(date.to_string()),
                mood: json!(mood),
                sound: json!(sound),
                light: json!(2),
                ..Default::default()
            };
            Entry::from_raw(&raw, today).unwrap()
        };
        let entries = vec![make("2024-03-09", 6, 6), make("2024-03-02", 4, 2)];

        let series = trend_series(&entries);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(series[0].mood, 4.0);
        assert_eq!(series[0].sensitivity, 1.0);
        assert_eq!(series[1].sensitivity, 2.0);
    }

    #[test]
    fn test_empty_history_has_no_points() {
        assert!(trend_series(&[]).is_empty());
    }
}
