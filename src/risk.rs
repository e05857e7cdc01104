//! Risk scoring
//!
//! Converts window statistics and today's entry into a bounded score with an
//! ordered rationale.
//!
//! ```text
//! base  = 0.5 * average_sensitivity
//!       + 0.8 * low_sleep_days
//!       + 0.4 * draining_interactions
//!       + 1.0 * exposure_weight
//! score = min(10, round(base))
//! ```
//!
//! Rounding is half away from zero (`f64::round`), so a base of 7.5 scores 8.

use crate::config::{ScoringConfig, SCORE_CEILING};
use crate::types::{Entry, RiskAssessment, RiskFactor, RiskScore, WindowStats};

/// Deterministic heuristic scorer
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score a window.
    ///
    /// Returns [`RiskScore::NoData`] with a "no data yet" rationale when the
    /// window is empty. Exposure comes from `today`; a missing entry weighs 0.
    pub fn score(&self, today: Option<&Entry>, stats: &WindowStats) -> RiskAssessment {
        if stats.window_size == 0 {
            return RiskAssessment {
                score: RiskScore::NoData,
                rationale: vec![RiskFactor::NoData],
            };
        }

        let exposure_weight = today.map(|e| e.exposure.weight()).unwrap_or(0);
        let average_sensitivity = stats.average_sensitivity.unwrap_or(0.0);

        let base = self.base_score(
            average_sensitivity,
            stats.low_sleep_days,
            stats.draining_interactions,
            exposure_weight,
        );

        RiskAssessment {
            score: RiskScore::Score(self.bound(base)),
            rationale: self.rationale(
                average_sensitivity,
                stats.low_sleep_days,
                stats.draining_interactions,
                exposure_weight,
            ),
        }
    }

    /// Weighted sum before rounding
    pub fn base_score(
        &self,
        average_sensitivity: f64,
        low_sleep_days: u32,
        draining_interactions: u32,
        exposure_weight: u8,
    ) -> f64 {
        let w = &self.config.weights;
        w.sensitivity * average_sensitivity
            + w.low_sleep * f64::from(low_sleep_days)
            + w.draining * f64::from(draining_interactions)
            + w.exposure * f64::from(exposure_weight)
    }

    /// Round half away from zero and cap at the configured maximum, never
    /// above [`SCORE_CEILING`]
    fn bound(&self, base: f64) -> u8 {
        let max = f64::from(self.config.max_score.min(SCORE_CEILING));
        base.round().clamp(0.0, max) as u8
    }

    fn rationale(
        &self,
        average_sensitivity: f64,
        low_sleep_days: u32,
        draining_interactions: u32,
        exposure_weight: u8,
    ) -> Vec<RiskFactor> {
        let t = &self.config.thresholds;
        let mut factors = Vec::new();

        if average_sensitivity >= t.high_sensitivity {
            factors.push(RiskFactor::HighSensitivity);
        }
        if low_sleep_days >= t.low_sleep_days {
            factors.push(RiskFactor::LowSleep);
        }
        if draining_interactions >= t.draining_interactions {
            factors.push(RiskFactor::DrainingInteractions);
        }
        if exposure_weight > 0 {
            factors.push(RiskFactor::ElevatedExposure);
        }

        if factors.is_empty() {
            factors.push(RiskFactor::Stable);
        }
        factors
    }
}
