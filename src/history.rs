//! Entry history
//!
//! A date-unique collection of entries kept in insertion order. This is the
//! lifecycle surface the form-capture side drives (upsert by date, delete by
//! id); the scoring engine only ever reads it.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::TrackError;
use crate::types::Entry;

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new date was appended
    Inserted(Uuid),
    /// An existing date was overwritten; carries the preserved id
    Replaced(Uuid),
}

impl UpsertOutcome {
    pub fn id(&self) -> Uuid {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Replaced(id) => *id,
        }
    }
}

/// Date-unique entry collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct History {
    entries: Vec<Entry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history, rejecting duplicate dates
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, TrackError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.date) {
                return Err(TrackError::DuplicateDate(entry.date.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Insert an entry, or replace the entry with the same date.
    ///
    /// A replacement keeps the existing entry's id and position.
    pub fn upsert(&mut self, mut entry: Entry) -> UpsertOutcome {
        match self.entries.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => {
                entry.id = existing.id;
                *existing = entry;
                debug!("replaced entry for {}", existing.date);
                UpsertOutcome::Replaced(existing.id)
            }
            None => {
                let id = entry.id;
                debug!("inserted entry for {}", entry.date);
                self.entries.push(entry);
                UpsertOutcome::Inserted(id)
            }
        }
    }

    /// Remove the entry with the given id
    pub fn delete(&mut self, id: Uuid) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(index);
        debug!("deleted entry for {}", removed.date);
        Some(removed)
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Option<&Entry> {
        self.entries.iter().find(|e| e.date == date)
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with the most recently added first
    pub fn newest_first(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().rev()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        debug!("cleared {removed} entries");
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl TryFrom<Vec<Entry>> for History {
    type Error = TrackError;

    fn try_from(entries: Vec<Entry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<History> for Vec<Entry> {
    fn from(history: History) -> Self {
        history.entries
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawEntry;
    use serde_json::json;

    fn entry(date: &str, mood: i64) -> Entry {
        let raw = RawEntry {
            date: Some(date.to_string()),
            mood: json!(mood),
            ..Default::default()
        };
        Entry::from_raw(&raw, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_upsert_inserts_new_dates() {
        let mut history = History::new();
        let first = entry("2024-01-01", 5);
        let first_id = first.id;

        assert_eq!(history.upsert(first), UpsertOutcome::Inserted(first_id));
        history.upsert(entry("2024-01-02", 6));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].id, first_id);
    }

    #[test]
    fn test_upsert_same_date_preserves_id() {
        let mut history = History::new();
        let original = entry("2024-01-01", 5);
        let original_id = original.id;
        history.upsert(original);
        history.upsert(entry("2024-01-02", 4));

        let replacement = entry("2024-01-01", 9);
        assert_ne!(replacement.id, original_id);

        let outcome = history.upsert(replacement);

        assert_eq!(outcome, UpsertOutcome::Replaced(original_id));
        assert_eq!(history.len(), 2);
        let stored = history
            .find_by_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap();
        assert_eq!(stored.id, original_id);
        assert_eq!(stored.mood, 9.0);
        // position is kept
        assert_eq!(history.entries()[0].id, original_id);
    }

    #[test]
    fn test_delete_by_id() {
        let mut history = History::new();
        let target = entry("2024-01-01", 5);
        let target_id = target.id;
        history.upsert(target);
        history.upsert(entry("2024-01-02", 6));

        let removed = history.delete(target_id).unwrap();
        assert_eq!(removed.id, target_id);
        assert_eq!(history.len(), 1);
        assert!(history.find_by_id(target_id).is_none());
        assert!(history.delete(target_id).is_none());
    }

    #[test]
    fn test_from_entries_rejects_duplicate_dates() {
        let result = History::from_entries(vec![entry("2024-01-01", 5), entry("2024-01-01", 6)]);
        assert!(matches!(result, Err(TrackError::DuplicateDate(d)) if d == "2024-01-01"));
    }

    #[test]
    fn test_deserialize_enforces_uniqueness() {
        let a = entry("2024-01-01", 5);
        let b = entry("2024-01-01", 6);
        let json = serde_json::to_string(&vec![a, b]).unwrap();
        assert!(serde_json::from_str::<History>(&json).is_err());
    }

    #[test]
    fn test_newest_first_and_clear() {
        let mut history = History::new();
        history.upsert(entry("2024-01-03", 5));
        history.upsert(entry("2024-01-01", 6));
        history.upsert(entry("2024-01-03", 7));

        let moods: Vec<f64> = history.newest_first().map(|e| e.mood).collect();
        assert_eq!(moods, vec![6.0, 7.0]);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.newest_first().count(), 0);
    }
}
