//! Entry construction
//!
//! Turns raw form input into a normalized [`Entry`]:
//! - Score fields coerced to numbers and clamped to 0-10
//! - Exercise coerced and floored at 0
//! - Comma-separated lists split, trimmed, and emptied of blanks

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::TrackError;
use crate::types::{Entry, Exposure, RawEntry, Sensitivity, SocialLoad};

/// Lower bound of every score field
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score field
pub const SCORE_MAX: f64 = 10.0;

/// ISO calendar date format used for entry keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl Entry {
    /// Build an entry from raw input with a freshly generated id.
    ///
    /// `today` is used when the raw date is missing or blank. A present but
    /// unparsable date is rejected; numeric fields never fail.
    pub fn from_raw(raw: &RawEntry, today: NaiveDate) -> Result<Self, TrackError> {
        Self::from_raw_with_id(raw, today, Uuid::new_v4())
    }

    /// Same as [`Entry::from_raw`] with a caller-chosen id
    pub fn from_raw_with_id(
        raw: &RawEntry,
        today: NaiveDate,
        id: Uuid,
    ) -> Result<Self, TrackError> {
        let date = match raw.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(text) => parse_date(text)?,
        };

        Ok(Self {
            id,
            date,
            mood: clamp_score(&raw.mood),
            energy: clamp_score(&raw.energy),
            sleep: clamp_score(&raw.sleep),
            sensitivity: Sensitivity {
                sound: clamp_score(&raw.sound),
                light: clamp_score(&raw.light),
                touch: clamp_score(&raw.touch),
                smell: clamp_score(&raw.smell),
            },
            social: SocialLoad::from_label(raw.social.as_deref().unwrap_or_default()),
            exposure: Exposure::from_label(raw.exposure.as_deref().unwrap_or_default()),
            exercise: non_negative(&raw.exercise),
            meds: raw.meds.clone().unwrap_or_default(),
            triggers: split_tokens(raw.triggers.as_deref().unwrap_or_default()),
            helps: split_tokens(raw.helps.as_deref().unwrap_or_default()),
            notes: raw.notes.clone().unwrap_or_default(),
        })
    }

    /// Trim list tokens and drop blank ones, as [`split_tokens`] does for
    /// form input
    pub fn normalize_lists(&mut self) {
        for list in [&mut self.triggers, &mut self.helps] {
            let tokens = std::mem::take(list);
            *list = tokens
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Check the numeric invariants of an entry that did not come through
    /// [`Entry::from_raw`] (e.g. an imported record).
    pub fn validate(&self) -> Result<(), TrackError> {
        let scores = [
            ("mood", self.mood),
            ("energy", self.energy),
            ("sleep", self.sleep),
            ("sens.sound", self.sensitivity.sound),
            ("sens.light", self.sensitivity.light),
            ("sens.touch", self.sensitivity.touch),
            ("sens.smell", self.sensitivity.smell),
        ];

        for (field, value) in scores {
            if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
                return Err(TrackError::InvalidImport(format!(
                    "entry {} has {} = {} outside [0, 10]",
                    self.date, field, value
                )));
            }
        }

        if !self.exercise.is_finite() || self.exercise < 0.0 {
            return Err(TrackError::InvalidImport(format!(
                "entry {} has negative or non-finite exercise {}",
                self.date, self.exercise
            )));
        }

        Ok(())
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate, TrackError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| TrackError::InvalidDate(format!("{text:?}: {e}")))
}

/// Coerce a raw value to a number, clamped to the score range.
pub fn clamp_score(value: &serde_json::Value) -> f64 {
    coerce_number(value).clamp(SCORE_MIN, SCORE_MAX)
}

/// Coerce a raw value to a finite, non-negative number
fn non_negative(value: &serde_json::Value) -> f64 {
    let n = coerce_number(value);
    if n.is_finite() {
        n.max(0.0)
    } else {
        0.0
    }
}

/// Lenient numeric coercion.
///
/// Numbers pass through, numeric strings are parsed (blank is 0), booleans
/// map to 1/0, and anything else (null, arrays, objects, garbage) is 0.
/// NaN is 0. Infinities are kept so clamping can pin them to a bound.
pub fn coerce_number(value: &serde_json::Value) -> f64 {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        serde_json::Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// Split a comma-separated list, trimming tokens and dropping blanks.
/// Order and duplicates are preserved.
pub fn split_tokens(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
