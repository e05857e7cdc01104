//! Scoring configuration
//!
//! Weights, thresholds and window length used by the aggregator and risk
//! scorer. The defaults reproduce the reference heuristic exactly; a JSON
//! file can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// Default rolling window in days
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Sleep at or below this counts as a low-sleep day
pub const DEFAULT_LOW_SLEEP_MAX: f64 = 5.0;

/// Hard ceiling of the risk score regardless of configuration
pub const SCORE_CEILING: u8 = 10;

/// Weights applied to each term of the risk base score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub sensitivity: f64,
    pub low_sleep: f64,
    pub draining: f64,
    pub exposure: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            sensitivity: 0.5,
            low_sleep: 0.8,
            draining: 0.4,
            exposure: 1.0,
        }
    }
}

/// Minimum values at which a factor is named in the rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RationaleThresholds {
    pub high_sensitivity: f64,
    pub low_sleep_days: u32,
    pub draining_interactions: u32,
}

impl Default for RationaleThresholds {
    fn default() -> Self {
        Self {
            high_sensitivity: 6.0,
            low_sleep_days: 2,
            draining_interactions: 2,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Rolling window length in days
    pub window_days: u32,
    /// Sleep score at or below which a day counts as low sleep
    pub low_sleep_max: f64,
    /// Upper bound of the final score, at most [`SCORE_CEILING`]
    pub max_score: u8,
    pub weights: RiskWeights,
    pub thresholds: RationaleThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            low_sleep_max: DEFAULT_LOW_SLEEP_MAX,
            max_score: SCORE_CEILING,
            weights: RiskWeights::default(),
            thresholds: RationaleThresholds::default(),
        }
    }
}

impl ScoringConfig {
    /// Load configuration from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        let config: ScoringConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, TrackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that would break the score bounds
    pub fn validate(&self) -> Result<(), TrackError> {
        if self.window_days == 0 {
            return Err(TrackError::ConfigError(
                "window_days must be at least 1".to_string(),
            ));
        }

        if self.max_score > SCORE_CEILING {
            return Err(TrackError::ConfigError(format!(
                "max_score must be at most {SCORE_CEILING}, got {}",
                self.max_score
            )));
        }

        let weights = [
            ("sensitivity", self.weights.sensitivity),
            ("low_sleep", self.weights.low_sleep),
            ("draining", self.weights.draining),
            ("exposure", self.weights.exposure),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(TrackError::ConfigError(format!(
                    "weight {name} must be a non-negative number, got {weight}"
                )));
            }
        }

        if !self.low_sleep_max.is_finite() {
            return Err(TrackError::ConfigError(
                "low_sleep_max must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ScoringConfig::from_json(r#"{ "window_days": 14, "weights": { "exposure": 1.5 } }"#)
            .unwrap();

        assert_eq!(config.window_days, 14);
        assert_eq!(config.weights.exposure, 1.5);
        assert_eq!(config.weights.sensitivity, 0.5);
        assert_eq!(config.thresholds, RationaleThresholds::default());
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(matches!(
            ScoringConfig::from_json(r#"{ "window_days": 0 }"#),
            Err(TrackError::ConfigError(_))
        ));
    }

    #[test]
    fn test_rejects_negative_weight() {
        assert!(ScoringConfig::from_json(r#"{ "weights": { "draining": -0.4 } }"#).is_err());
    }

    #[test]
    fn test_rejects_score_ceiling_above_ten() {
        assert!(matches!(
            ScoringConfig::from_json(r#"{ "max_score": 50 }"#),
            Err(TrackError::ConfigError(_))
        ));
        assert_eq!(
            ScoringConfig::from_json(r#"{ "max_score": 8 }"#).unwrap().max_score,
            8
        );
    }

    #[test]
    fn test_serialization() {
        let config = ScoringConfig::default();
        let loaded = ScoringConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, loaded);
    }
}
