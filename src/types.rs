//! Core types for the NeuroTrack engine
//!
//! This module defines the data structures that flow through the engine:
//! raw form input, normalized entries, window statistics, risk assessments,
//! trigger insights and the combined dashboard summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Social load reported for the day.
///
/// Only the draining label carries meaning for scoring; every other label is
/// preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialLoad {
    #[serde(rename = "desgastante")]
    Draining,
    /// Any other label, including an empty one
    #[serde(untagged)]
    Other(String),
}

impl SocialLoad {
    pub fn from_label(label: &str) -> Self {
        match label {
            "desgastante" => SocialLoad::Draining,
            other => SocialLoad::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SocialLoad::Draining => "desgastante",
            SocialLoad::Other(label) => label.as_str(),
        }
    }

    pub fn is_draining(&self) -> bool {
        matches!(self, SocialLoad::Draining)
    }
}

impl Default for SocialLoad {
    fn default() -> Self {
        SocialLoad::Other(String::new())
    }
}

/// Sensory exposure expected or experienced on the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exposure {
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "média")]
    Medium,
    #[serde(rename = "baixa")]
    Low,
    /// Unrecognized labels weigh nothing
    #[serde(untagged)]
    Other(String),
}

impl Exposure {
    pub fn from_label(label: &str) -> Self {
        match label {
            "alta" => Exposure::High,
            "média" => Exposure::Medium,
            "baixa" => Exposure::Low,
            other => Exposure::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Exposure::High => "alta",
            Exposure::Medium => "média",
            Exposure::Low => "baixa",
            Exposure::Other(label) => label.as_str(),
        }
    }

    /// Weight contributed to the risk base score
    pub fn weight(&self) -> u8 {
        match self {
            Exposure::High => 2,
            Exposure::Medium => 1,
            Exposure::Low | Exposure::Other(_) => 0,
        }
    }
}

impl Default for Exposure {
    fn default() -> Self {
        Exposure::Other(String::new())
    }
}

/// Sensory sensitivity sub-scores (each 0-10)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sensitivity {
    pub sound: f64,
    pub light: f64,
    pub touch: f64,
    pub smell: f64,
}

impl Sensitivity {
    pub fn uniform(value: f64) -> Self {
        Self {
            sound: value,
            light: value,
            touch: value,
            smell: value,
        }
    }

    pub fn total(&self) -> f64 {
        self.sound + self.light + self.touch + self.smell
    }

    /// Mean of the four sub-scores
    pub fn mean(&self) -> f64 {
        self.total() / 4.0
    }
}

/// One day's normalized observation.
///
/// Built from [`RawEntry`] via [`Entry::from_raw`](crate::entry); every score
/// field is guaranteed to lie in `[0, 10]` and `exercise` is non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque identifier, preserved across same-date replacements
    pub id: Uuid,
    /// Calendar date (YYYY-MM-DD), unique within a history
    pub date: NaiveDate,
    pub mood: f64,
    pub energy: f64,
    pub sleep: f64,
    #[serde(rename = "sens")]
    pub sensitivity: Sensitivity,
    #[serde(default)]
    pub social: SocialLoad,
    #[serde(default)]
    pub exposure: Exposure,
    /// Exercise duration/count (>= 0, uncapped)
    #[serde(default)]
    pub exercise: f64,
    #[serde(default)]
    pub meds: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub helps: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Unvalidated form input for a single day.
///
/// Numeric fields accept anything a form can produce: JSON numbers, numeric
/// strings, booleans, or null. List fields are comma-separated strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEntry {
    /// ISO date; defaults to the reference day when absent or blank
    pub date: Option<String>,
    pub mood: serde_json::Value,
    pub energy: serde_json::Value,
    pub sleep: serde_json::Value,
    pub sound: serde_json::Value,
    pub light: serde_json::Value,
    pub touch: serde_json::Value,
    pub smell: serde_json::Value,
    pub social: Option<String>,
    pub exposure: Option<String>,
    pub exercise: serde_json::Value,
    pub meds: Option<String>,
    pub triggers: Option<String>,
    pub helps: Option<String>,
    pub notes: Option<String>,
}

/// Rolling-window statistics derived by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Number of entries in the window
    pub window_size: usize,
    /// Mean sensitivity across days and sub-scores (None when empty)
    pub average_sensitivity: Option<f64>,
    /// Days with sleep <= 5
    pub low_sleep_days: u32,
    /// Days with a draining social load
    pub draining_interactions: u32,
    /// Mean mood rounded to one decimal (None when empty)
    pub average_mood: Option<f64>,
}

impl WindowStats {
    pub fn empty() -> Self {
        Self {
            window_size: 0,
            average_sensitivity: None,
            low_sleep_days: 0,
            draining_interactions: 0,
            average_mood: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.window_size > 0
    }
}

/// Bounded risk score, or the no-data sentinel.
///
/// Serializes as a plain number, or `null` for [`RiskScore::NoData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u8>", into = "Option<u8>")]
pub enum RiskScore {
    Score(u8),
    NoData,
}

impl RiskScore {
    pub fn value(&self) -> Option<u8> {
        match self {
            RiskScore::Score(v) => Some(*v),
            RiskScore::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, RiskScore::NoData)
    }
}

impl From<Option<u8>> for RiskScore {
    fn from(value: Option<u8>) -> Self {
        match value {
            Some(v) => RiskScore::Score(v),
            None => RiskScore::NoData,
        }
    }
}

impl From<RiskScore> for Option<u8> {
    fn from(score: RiskScore) -> Self {
        score.value()
    }
}

/// Label explaining a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "high sensitivity")]
    HighSensitivity,
    #[serde(rename = "low sleep")]
    LowSleep,
    #[serde(rename = "draining interactions")]
    DrainingInteractions,
    #[serde(rename = "elevated sensory exposure")]
    ElevatedExposure,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "no data yet")]
    NoData,
}

impl RiskFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::HighSensitivity => "high sensitivity",
            RiskFactor::LowSleep => "low sleep",
            RiskFactor::DrainingInteractions => "draining interactions",
            RiskFactor::ElevatedExposure => "elevated sensory exposure",
            RiskFactor::Stable => "stable",
            RiskFactor::NoData => "no data yet",
        }
    }
}

/// Risk score together with its ordered rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: RiskScore,
    pub rationale: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Rationale joined for display ("low sleep, draining interactions")
    pub fn rationale_text(&self) -> String {
        self.rationale
            .iter()
            .map(RiskFactor::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Dominant trigger across a history and its coping tip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerInsight {
    /// Most frequent trigger, None when no trigger was ever logged
    pub top_trigger: Option<String>,
    /// Occurrences of the top trigger
    pub count: usize,
    /// Coping tip; empty when there is no trigger
    pub tip: String,
}

/// One point of the per-day trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub mood: f64,
    /// Mean of the four sensitivity sub-scores
    pub sensitivity: f64,
}

/// Everything a dashboard needs, computed in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub computed_at_utc: DateTime<Utc>,
    pub window_days: u32,
    pub window: WindowStats,
    pub risk: RiskAssessment,
    pub average_mood: Option<f64>,
    pub triggers: TriggerInsight,
    pub trends: Vec<TrendPoint>,
}
