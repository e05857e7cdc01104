//! NeuroTrack - On-device risk scoring for daily sensory self-observations
//!
//! NeuroTrack turns a history of daily entries (mood, energy, sleep, sensory
//! sensitivity, social load, triggers) into a short-term risk indicator and
//! simple trend summaries through a deterministic pipeline: entry
//! normalization → rolling-window aggregation → risk scoring → trigger
//! analysis.
//!
//! ## Modules
//!
//! - **Entry Model**: raw form input clamped and normalized into [`Entry`]
//! - **History**: date-unique collection with upsert/delete
//! - **Aggregator**: trailing-window statistics relative to an explicit instant
//! - **Risk Scorer**: bounded 0-10 score with an ordered rationale
//! - **Trigger Analyzer**: dominant trigger and coping tip
//! - **Exchange**: lossless JSON/CSV export and validated import

pub mod aggregator;
pub mod config;
pub mod entry;
pub mod error;
pub mod exchange;
pub mod history;
pub mod pipeline;
pub mod risk;
pub mod trends;
pub mod triggers;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregator::{Aggregator, Window};
pub use config::ScoringConfig;
pub use error::TrackError;
pub use history::{History, UpsertOutcome};
pub use pipeline::{history_json_to_summary, summarize, TrackerEngine};
pub use risk::RiskScorer;
pub use triggers::TriggerAnalyzer;
pub use types::{
    DashboardSummary, Entry, Exposure, RawEntry, RiskAssessment, RiskFactor, RiskScore,
    Sensitivity, SocialLoad, TrendPoint, TriggerInsight, WindowStats,
};

/// Engine version reported by the CLI
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "neurotrack";
