//! Pipeline orchestration
//!
//! This module provides the one-call API for NeuroTrack. It runs the engine
//! stages over a history and gathers their outputs for rendering:
//!
//! 1. Aggregator - trailing window, today's entry, window statistics
//! 2. RiskScorer - bounded score with rationale
//! 3. TriggerAnalyzer - dominant trigger over the full history
//! 4. Trends - date-ordered mood/sensitivity series

use chrono::{DateTime, Utc};
use log::debug;

use crate::aggregator::Aggregator;
use crate::config::ScoringConfig;
use crate::error::TrackError;
use crate::exchange;
use crate::history::History;
use crate::risk::RiskScorer;
use crate::trends::trend_series;
use crate::triggers::TriggerAnalyzer;
use crate::types::{DashboardSummary, Entry};

/// Summarize a history with the default configuration.
///
/// # Example
/// ```ignore
/// let summary = summarize(history.entries(), Utc::now());
/// println!("risk: {:?} ({})", summary.risk.score, summary.risk.rationale_text());
/// ```
pub fn summarize(entries: &[Entry], now: DateTime<Utc>) -> DashboardSummary {
    TrackerEngine::default().summarize(entries, now)
}

/// Parse a JSON history export and summarize it as JSON.
///
/// # Arguments
/// * `history_json` - JSON array of entries (as written by the JSON export)
/// * `now` - Reference instant for the window and today's entry
pub fn history_json_to_summary(
    history_json: &str,
    now: DateTime<Utc>,
) -> Result<String, TrackError> {
    let history = exchange::import_json(history_json)?;
    let summary = summarize(history.entries(), now);
    Ok(serde_json::to_string(&summary)?)
}

/// Engine bound to a scoring configuration.
///
/// Holds no per-call state; the same inputs always yield the same summary.
#[derive(Debug, Clone, Default)]
pub struct TrackerEngine {
    config: ScoringConfig,
    aggregator: Aggregator,
    scorer: RiskScorer,
}

impl TrackerEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            aggregator: Aggregator::new(&config),
            scorer: RiskScorer::new(config.clone()),
            config,
        }
    }

    /// Load the configuration from JSON
    pub fn from_config_json(json: &str) -> Result<Self, TrackError> {
        Ok(Self::new(ScoringConfig::from_json(json)?))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn summarize(&self, entries: &[Entry], now: DateTime<Utc>) -> DashboardSummary {
        let window = self.aggregator.window(entries, now);
        let risk = self.scorer.score(window.today, &window.stats);
        let triggers = TriggerAnalyzer::analyze(entries);
        let trends = trend_series(entries);

        debug!(
            "summarized {} entries: window={} score={:?}",
            entries.len(),
            window.stats.window_size,
            risk.score
        );

        DashboardSummary {
            computed_at_utc: now,
            window_days: self.aggregator.window_days(),
            average_mood: window.stats.average_mood,
            window: window.stats,
            risk,
            triggers,
            trends,
        }
    }

    pub fn summarize_history(&self, history: &History, now: DateTime<Utc>) -> DashboardSummary {
        self.summarize(history.entries(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawEntry, RiskFactor, RiskScore};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
    }

    fn raw(date: &str, sleep: i64, sens: i64, social: &str, exposure: &str, triggers: &str) -> RawEntry {
        RawEntry {
            date: Some(date.to_string()),
            mood: json!(6),
            energy: json!(5),
            sleep: json!(sleep),
            sound: json!(sens),
            light: json!(sens),
            touch: json!(sens),
            smell: json!(sens),
            social: Some(social.to_string()),
            exposure: Some(exposure.to_string()),
            triggers: Some(triggers.to_string()),
            ..Default::default()
        }
    }

    fn sample_history() -> History {
        let mut history = History::new();
        let today = now().date_naive();
        for r in [
            raw("2024-03-08", 4, 7, "desgastante", "baixa", "barulho"),
            raw("2024-03-09", 5, 7, "neutro", "baixa", "luz"),
            raw("2024-03-10", 8, 7, "neutro", "alta", "barulho"),
        ] {
            history.upsert(Entry::from_raw(&r, today).unwrap());
        }
        history
    }

    #[test]
    fn test_full_summary() {
        let history = sample_history();
        let summary = TrackerEngine::default().summarize_history(&history, now());

        assert_eq!(summary.window.window_size, 3);
        assert_eq!(summary.window.low_sleep_days, 2);
        assert_eq!(summary.window.draining_interactions, 1);
        assert_eq!(summary.risk.score, RiskScore::Score(8));
        assert_eq!(
            summary.risk.rationale,
            vec![
                RiskFactor::HighSensitivity,
                RiskFactor::LowSleep,
                RiskFactor::ElevatedExposure
            ]
        );
        assert_eq!(summary.average_mood, Some(6.0));
        assert_eq!(summary.triggers.top_trigger.as_deref(), Some("barulho"));
        assert_eq!(summary.trends.len(), 3);
        assert_eq!(summary.window_days, 7);
    }

    #[test]
    fn test_stale_history_has_no_score_but_keeps_triggers() {
        let history = sample_history();
        let later = Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap();
        let summary = summarize(history.entries(), later);

        assert!(summary.risk.score.is_no_data());
        assert_eq!(summary.average_mood, None);
        assert_eq!(summary.triggers.top_trigger.as_deref(), Some("barulho"));
    }

    #[test]
    fn test_summary_is_deterministic() {
        let history = sample_history();
        assert_eq!(
            summarize(history.entries(), now()),
            summarize(history.entries(), now())
        );
    }

    #[test]
    fn test_json_entry_point() {
        let history = sample_history();
        let json = exchange::export_json(&history).unwrap();
        let summary_json = history_json_to_summary(&json, now()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&summary_json).unwrap();
        assert_eq!(value["risk"]["score"], json!(8));
        assert_eq!(value["triggers"]["top_trigger"], json!("barulho"));
    }

    #[test]
    fn test_custom_config() {
        let engine = TrackerEngine::from_config_json(r#"{ "max_score": 5 }"#).unwrap();
        let summary = engine.summarize_history(&sample_history(), now());
        assert_eq!(summary.risk.score, RiskScore::Score(5));
    }
}
