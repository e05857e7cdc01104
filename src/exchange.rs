//! History export and import
//!
//! Two interchange formats:
//! - JSON: pretty-printed array of entries
//! - CSV: one quoted row per entry with a fixed header
//!
//! Both are lossless. In CSV, list fields are joined with `|` and any `|` or
//! `\` inside a token is backslash-escaped; notes keep their newlines inside
//! the quoted field. Imports validate the whole payload before producing a
//! history, so a rejected import never touches the caller's data. List tokens
//! of imported entries are trimmed and blank ones dropped.

use log::{info, warn};
use uuid::Uuid;

use crate::entry::parse_date;
use crate::error::TrackError;
use crate::history::History;
use crate::types::{Entry, Exposure, Sensitivity, SocialLoad};

/// CSV column order
pub const CSV_HEADER: [&str; 16] = [
    "id", "date", "mood", "energy", "sleep", "sound", "light", "touch", "smell", "social",
    "exposure", "exercise", "meds", "triggers", "helps", "notes",
];

const LIST_DELIMITER: char = '|';
const LIST_ESCAPE: char = '\\';

/// Serialize a history as a pretty-printed JSON array
pub fn export_json(history: &History) -> Result<String, TrackError> {
    Ok(serde_json::to_string_pretty(history.entries())?)
}

/// Parse and validate a JSON array of entries.
///
/// Rejects anything that is not an array of well-formed entries, entries
/// whose scores fall outside `[0, 10]`, and repeated dates.
pub fn import_json(json: &str) -> Result<History, TrackError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        warn!("rejected import: payload is not an array");
        return Err(TrackError::InvalidImport(
            "expected a JSON array of entries".to_string(),
        ));
    }

    let entries: Vec<Entry> = serde_json::from_value(value).map_err(|e| {
        warn!("rejected import: {e}");
        TrackError::InvalidImport(e.to_string())
    })?;

    validated_history(entries)
}

/// Serialize a history as CSV with [`CSV_HEADER`] as the first row
pub fn export_csv(history: &History) -> Result<String, TrackError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for e in history.iter() {
        writer.write_record([
            e.id.to_string(),
            e.date.to_string(),
            e.mood.to_string(),
            e.energy.to_string(),
            e.sleep.to_string(),
            e.sensitivity.sound.to_string(),
            e.sensitivity.light.to_string(),
            e.sensitivity.touch.to_string(),
            e.sensitivity.smell.to_string(),
            e.social.as_str().to_string(),
            e.exposure.as_str().to_string(),
            e.exercise.to_string(),
            e.meds.clone(),
            join_list(&e.triggers),
            join_list(&e.helps),
            e.notes.clone(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| TrackError::CsvError {
        line: 0,
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| TrackError::CsvError {
        line: 0,
        message: e.to_string(),
    })
}

/// Parse and validate CSV written by [`export_csv`]
pub fn import_csv(data: &str) -> Result<History, TrackError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let header = reader.headers()?;
    if header.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(TrackError::CsvError {
            line: 1,
            message: format!("unexpected header, expected {}", CSV_HEADER.join(",")),
        });
    }

    let entries = reader
        .records()
        .map(|record| -> Result<Entry, TrackError> {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            entry_from_row(line, &record)
        })
        .collect::<Result<Vec<_>, TrackError>>()?;

    validated_history(entries)
}

impl History {
    /// Replace the whole history from a JSON export.
    ///
    /// On error the current entries are left untouched.
    pub fn replace_from_json(&mut self, json: &str) -> Result<(), TrackError> {
        *self = import_json(json)?;
        Ok(())
    }

    /// Replace the whole history from a CSV export.
    ///
    /// On error the current entries are left untouched.
    pub fn replace_from_csv(&mut self, csv: &str) -> Result<(), TrackError> {
        *self = import_csv(csv)?;
        Ok(())
    }
}

fn validated_history(mut entries: Vec<Entry>) -> Result<History, TrackError> {
    for entry in &mut entries {
        entry.validate()?;
        entry.normalize_lists();
    }
    let history = History::from_entries(entries)?;
    info!("imported {} entries", history.len());
    Ok(history)
}

fn entry_from_row(line: usize, fields: &csv::StringRecord) -> Result<Entry, TrackError> {
    if fields.len() != CSV_HEADER.len() {
        return Err(TrackError::CsvError {
            line,
            message: format!("expected {} fields, found {}", CSV_HEADER.len(), fields.len()),
        });
    }

    let number = |index: usize| -> Result<f64, TrackError> {
        fields[index].trim().parse::<f64>().map_err(|_| TrackError::CsvError {
            line,
            message: format!("{} is not a number: {:?}", CSV_HEADER[index], &fields[index]),
        })
    };

    let id = Uuid::parse_str(fields[0].trim()).map_err(|e| TrackError::CsvError {
        line,
        message: format!("invalid id: {e}"),
    })?;

    Ok(Entry {
        id,
        date: parse_date(&fields[1])?,
        mood: number(2)?,
        energy: number(3)?,
        sleep: number(4)?,
        sensitivity: Sensitivity {
            sound: number(5)?,
            light: number(6)?,
            touch: number(7)?,
            smell: number(8)?,
        },
        social: SocialLoad::from_label(&fields[9]),
        exposure: Exposure::from_label(&fields[10]),
        exercise: number(11)?,
        meds: fields[12].to_string(),
        triggers: split_list(&fields[13]),
        helps: split_list(&fields[14]),
        notes: fields[15].to_string(),
    })
}

/// Join list tokens, escaping the delimiter and escape characters
fn join_list(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| {
            let mut escaped = String::with_capacity(t.len());
            for c in t.chars() {
                if c == LIST_DELIMITER || c == LIST_ESCAPE {
                    escaped.push(LIST_ESCAPE);
                }
                escaped.push(c);
            }
            escaped
        })
        .collect::<Vec<_>>()
        .join(&LIST_DELIMITER.to_string())
}

/// Inverse of [`join_list`]
fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = field.chars();

    while let Some(c) = chars.next() {
        match c {
            LIST_ESCAPE => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            LIST_DELIMITER => tokens.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    tokens.push(current);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawEntry;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_history() -> History {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mut history = History::new();
        history.upsert(
            Entry::from_raw(
                &RawEntry {
                    date: Some("2024-03-09".to_string()),
                    mood: json!(6.5),
                    sleep: json!(4),
                    sound: json!(8),
                    social: Some("desgastante".to_string()),
                    exposure: Some("média".to_string()),
                    exercise: json!(30),
                    meds: Some("sertralina, 50mg".to_string()),
                    triggers: Some("barulho, luz|forte, a\\b".to_string()),
                    helps: Some("fone".to_string()),
                    notes: Some("said \"no\", went home\nslept early".to_string()),
                    ..Default::default()
                },
                today,
            )
            .unwrap(),
        );
        history.upsert(Entry::from_raw(&RawEntry::default(), today).unwrap());
        history
    }

    #[test]
    fn test_json_export_import() {
        let history = sample_history();
        let json = export_json(&history).unwrap();
        assert!(json.contains("\"sens\""));

        let imported = import_json(&json).unwrap();
        assert_eq!(imported, history);
    }

    #[test]
    fn test_json_import_rejects_non_array() {
        assert!(matches!(
            import_json(r#"{ "entries": [] }"#),
            Err(TrackError::InvalidImport(_))
        ));
        assert!(matches!(import_json("not json"), Err(TrackError::JsonError(_))));
    }

    #[test]
    fn test_json_import_rejects_malformed_entries() {
        let missing_scores = r#"[{ "id": "9b2f7c1e-4a3d-4e8b-9c1a-2f3e4d5c6b7a", "date": "2024-03-01" }]"#;
        assert!(matches!(
            import_json(missing_scores),
            Err(TrackError::InvalidImport(_))
        ));

        let mut history = sample_history();
        let mut value: serde_json::Value =
            serde_json::from_str(&export_json(&history).unwrap()).unwrap();
        value[0]["mood"] = json!(12);
        let out_of_range = value.to_string();
        assert!(import_json(&out_of_range).is_err());

        // a rejected import leaves the existing history alone
        let before = history.clone();
        assert!(history.replace_from_json(&out_of_range).is_err());
        assert_eq!(history, before);
    }

    #[test]
    fn test_json_import_rejects_duplicate_dates() {
        let history = sample_history();
        let mut value: serde_json::Value =
            serde_json::from_str(&export_json(&history).unwrap()).unwrap();
        value[1]["date"] = value[0]["date"].clone();
        assert!(matches!(
            import_json(&value.to_string()),
            Err(TrackError::DuplicateDate(_))
        ));
    }

    #[test]
    fn test_replace_from_json_swaps_history() {
        let mut history = History::new();
        let source = sample_history();
        history
            .replace_from_json(&export_json(&source).unwrap())
            .unwrap();
        assert_eq!(history, source);
    }

    #[test]
    fn test_csv_layout() {
        let csv = export_csv(&sample_history()).unwrap();
        let first_line = csv.lines().next().unwrap();
        assert_eq!(
            first_line,
            "\"id\",\"date\",\"mood\",\"energy\",\"sleep\",\"sound\",\"light\",\"touch\",\"smell\",\"social\",\"exposure\",\"exercise\",\"meds\",\"triggers\",\"helps\",\"notes\""
        );
        assert!(csv.contains(r#""barulho|luz\|forte|a\\b""#));
        assert!(csv.contains("\"said \"\"no\"\", went home\nslept early\""));
    }

    #[test]
    fn test_csv_is_lossless() {
        let history = sample_history();
        let imported = import_csv(&export_csv(&history).unwrap()).unwrap();
        assert_eq!(imported, history);
        assert_eq!(
            imported.entries()[0].triggers,
            vec!["barulho", "luz|forte", "a\\b"]
        );
    }

    #[test]
    fn test_csv_import_rejects_bad_rows() {
        let history = sample_history();
        let csv = export_csv(&history).unwrap();

        let bad_header = csv.replacen("\"mood\"", "\"humor\"", 1);
        assert!(matches!(import_csv(&bad_header), Err(TrackError::CsvError { line: 1, .. })));

        let bad_number = csv.replacen("\"6.5\"", "\"six\"", 1);
        assert!(matches!(import_csv(&bad_number), Err(TrackError::CsvError { .. })));

        let truncated = &csv[..csv.len() - 10];
        assert!(import_csv(truncated).is_err());

        assert!(import_csv("").is_err());
    }

    #[test]
    fn test_split_list_edge_cases() {
        assert!(split_list("").is_empty());
        assert_eq!(split_list("a"), vec!["a"]);
        assert_eq!(split_list(r"a\|b|c"), vec!["a|b", "c"]);
        assert_eq!(join_list(&["a|b".to_string(), "c".to_string()]), r"a\|b|c");
    }

    #[test]
    fn test_csv_accepts_crlf_and_blank_lines() {
        let mut history = History::new();
        history.upsert(
            Entry::from_raw(&RawEntry::default(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
                .unwrap(),
        );
        let csv = export_csv(&history).unwrap().replace('\n', "\r\n\r\n");
        assert_eq!(import_csv(&csv).unwrap(), history);
    }

    #[test]
    fn test_imported_lists_are_normalized() {
        let json = r#"[{
            "id": "9b2f7c1e-4a3d-4e8b-9c1a-2f3e4d5c6b7a",
            "date": "2024-03-01",
            "mood": 5, "energy": 5, "sleep": 7,
            "sens": { "sound": 2, "light": 2, "touch": 2, "smell": 2 },
            "triggers": ["", " barulho ", "  "],
            "helps": [" fone"]
        }]"#;
        let history = import_json(json).unwrap();
        assert_eq!(history.entries()[0].triggers, vec!["barulho"]);
        assert_eq!(history.entries()[0].helps, vec!["fone"]);

        let csv = export_csv(&history).unwrap();
        assert_eq!(import_csv(&csv).unwrap(), history);
    }
}
