//! Trigger analysis
//!
//! Ranks trigger tokens by frequency across the whole history and looks up a
//! coping tip for the dominant one.

use std::collections::HashMap;

use crate::types::{Entry, TriggerInsight};

/// Tips for well-known triggers, matched case-insensitively
const TRIGGER_TIPS: &[(&str, &str)] = &[
    ("barulho", "Prepare fone com cancelamento e rotas silenciosas."),
    (
        "multidão",
        "Evite horários de pico; combine saídas com ponto de fuga.",
    ),
    ("luz", "Óculos escuros/boné e apps de temperatura de cor."),
    ("calor", "Roupas leves, água e locais ventilados."),
];

/// Tip for triggers without a dedicated entry
pub const FALLBACK_TIP: &str = "Planeje um “pit stop” e recursos sensoriais à mão.";

/// A trigger token and how often it was logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCount {
    pub trigger: String,
    pub count: usize,
}

/// Frequency analysis over trigger tokens
pub struct TriggerAnalyzer;

impl TriggerAnalyzer {
    /// Dominant trigger with its tip.
    ///
    /// Ties go to the token encountered first in history order. When no
    /// trigger was ever logged the result has no trigger and an empty tip.
    pub fn analyze(entries: &[Entry]) -> TriggerInsight {
        match Self::ranking(entries).into_iter().next() {
            Some(top) => TriggerInsight {
                tip: tip_for(&top.trigger).to_string(),
                top_trigger: Some(top.trigger),
                count: top.count,
            },
            None => TriggerInsight {
                top_trigger: None,
                count: 0,
                tip: String::new(),
            },
        }
    }

    /// All tokens by descending count, ties in first-seen order.
    ///
    /// Matching is exact and case-sensitive.
    pub fn ranking(entries: &[Entry]) -> Vec<TriggerCount> {
        let mut counts: Vec<TriggerCount> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for trigger in entries.iter().flat_map(|e| e.triggers.iter()) {
            match index.get(trigger.as_str()) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(trigger.as_str(), counts.len());
                    counts.push(TriggerCount {
                        trigger: trigger.clone(),
                        count: 1,
                    });
                }
            }
        }

        // stable sort keeps first-seen order among equal counts
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }
}

/// Coping tip for a trigger; unknown triggers get [`FALLBACK_TIP`]
pub fn tip_for(trigger: &str) -> &'static str {
    let key = trigger.to_lowercase();
    TRIGGER_TIPS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, tip)| *tip)
        .unwrap_or(FALLBACK_TIP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawEntry;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn entry(day: u32, triggers: &str) -> Entry {
        let raw = RawEntry {
            date: Some(format!("2024-03-{day:02}")),
            triggers: Some(triggers.to_string()),
            ..Default::default()
        };
        Entry::from_raw(&raw, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_top_trigger_by_frequency() {
        let entries = vec![entry(1, "barulho"), entry(2, "luz"), entry(3, "barulho")];
        let insight = TriggerAnalyzer::analyze(&entries);

        assert_eq!(insight.top_trigger.as_deref(), Some("barulho"));
        assert_eq!(insight.count, 2);
        assert_eq!(insight.tip, tip_for("barulho"));
        assert_ne!(insight.tip, FALLBACK_TIP);
    }

    #[test]
    fn test_no_triggers_is_sentinel() {
        let entries = vec![entry(1, ""), entry(2, " , ")];
        let insight = TriggerAnalyzer::analyze(&entries);
        assert_eq!(insight.top_trigger, None);
        assert_eq!(insight.count, 0);
        assert!(insight.tip.is_empty());

        assert_eq!(TriggerAnalyzer::analyze(&[]).top_trigger, None);
    }

    #[test]
    fn test_ties_go_to_first_encountered() {
        let entries = vec![entry(5, "luz, calor"), entry(1, "calor, luz")];
        let insight = TriggerAnalyzer::analyze(&entries);
        assert_eq!(insight.top_trigger.as_deref(), Some("luz"));
    }

    #[test]
    fn test_duplicates_within_entry_count() {
        let entries = vec![entry(1, "calor, calor"), entry(2, "luz")];
        assert_eq!(
            TriggerAnalyzer::ranking(&entries),
            vec![
                TriggerCount {
                    trigger: "calor".to_string(),
                    count: 2
                },
                TriggerCount {
                    trigger: "luz".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_counting_is_case_sensitive() {
        let entries = vec![entry(1, "Luz"), entry(2, "luz"), entry(3, "Luz")];
        let ranking = TriggerAnalyzer::ranking(&entries);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].trigger, "Luz");
    }

    #[test]
    fn test_tip_lookup_is_case_insensitive() {
        assert_eq!(tip_for("BARULHO"), tip_for("barulho"));
        assert_eq!(tip_for("Multidão"), tip_for("multidão"));
        assert_eq!(tip_for("trânsito"), FALLBACK_TIP);
    }

    #[test]
    fn test_tip_table_text() {
        assert_eq!(
            tip_for("barulho"),
            "Prepare fone com cancelamento e rotas silenciosas."
        );
        assert_eq!(tip_for("CALOR"), "Roupas leves, água e locais ventilados.");
        assert_eq!(
            FALLBACK_TIP,
            "Planeje um “pit stop” e recursos sensoriais à mão."
        );
    }

    #[test]
    fn test_unknown_top_trigger_gets_fallback() {
        let insight = TriggerAnalyzer::analyze(&[entry(1, "fila")]);
        assert_eq!(insight.tip, FALLBACK_TIP);
    }
}
