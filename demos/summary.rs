//! Build a short history and print its dashboard summary

use chrono::{TimeZone, Utc};
use neurotrack::{Entry, History, RawEntry, TrackerEngine};

fn main() {
    let days = [
        r#"{ "date": "2024-03-06", "mood": 6, "energy": 5, "sleep": 7, "sound": 4, "light": 3, "touch": 2, "smell": 2, "social": "tranquilo", "exposure": "baixa", "triggers": "luz" }"#,
        r#"{ "date": "2024-03-08", "mood": "4", "energy": 3, "sleep": 4, "sound": 8, "light": 6, "touch": 5, "smell": 4, "social": "desgastante", "exposure": "média", "triggers": "barulho, multidão", "helps": "fone" }"#,
        r#"{ "date": "2024-03-09", "mood": 5, "energy": 4, "sleep": 5, "sound": 7, "light": 7, "touch": 6, "smell": 5, "social": "desgastante", "exposure": "alta", "triggers": "barulho", "helps": "fone, caminhada" }"#,
        r#"{ "date": "2024-03-10", "mood": 5, "energy": 5, "sleep": 6, "sound": 7, "light": 6, "touch": 6, "smell": 5, "exposure": "alta", "triggers": "barulho, calor" }"#,
    ];

    let Some(now) = Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).single() else {
        eprintln!("Error: invalid reference time");
        return;
    };
    let mut history = History::new();

    for day in days {
        let raw: RawEntry = match serde_json::from_str(day) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("Error: {e}");
                return;
            }
        };
        match Entry::from_raw(&raw, now.date_naive()) {
            Ok(entry) => {
                history.upsert(entry);
            }
            Err(e) => {
                eprintln!("Error: {e}");
                return;
            }
        }
    }

    let summary = TrackerEngine::default().summarize_history(&history, now);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
