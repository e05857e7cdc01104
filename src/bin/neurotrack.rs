//! NeuroTrack CLI - Command-line interface for the NeuroTrack engine
//!
//! Commands:
//! - add: Record (or replace) the entry for a day
//! - delete: Remove an entry by id
//! - list: Show entries and their ids, most recently added first
//! - wipe: Remove every entry
//! - summary: Risk score, rolling mood, top trigger and trends
//! - export: Write the history as JSON or CSV
//! - import: Replace the history from a validated JSON or CSV file
//! - validate: Check an export file without importing it

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

use neurotrack::exchange::{export_csv, export_json, import_csv, import_json};
use neurotrack::{
    DashboardSummary, Entry, History, RawEntry, RiskScore, TrackError, TrackerEngine,
    UpsertOutcome, ENGINE_VERSION, PRODUCER_NAME,
};

/// NeuroTrack - daily sensory self-observation tracker
#[derive(Parser)]
#[command(name = "neurotrack")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score short-term sensory risk from daily self-observations", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the entry for a day, replacing any entry with the same date
    Add {
        /// History file (JSON export); created if missing
        #[arg(long)]
        history: PathBuf,

        /// Entry date (YYYY-MM-DD), defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        mood: Option<String>,
        #[arg(long)]
        energy: Option<String>,
        #[arg(long)]
        sleep: Option<String>,

        /// Sound sensitivity (0-10)
        #[arg(long)]
        sound: Option<String>,
        /// Light sensitivity (0-10)
        #[arg(long)]
        light: Option<String>,
        /// Touch sensitivity (0-10)
        #[arg(long)]
        touch: Option<String>,
        /// Smell sensitivity (0-10)
        #[arg(long)]
        smell: Option<String>,

        /// Social load label (e.g. "desgastante")
        #[arg(long)]
        social: Option<String>,
        /// Sensory exposure ("alta", "média", "baixa")
        #[arg(long)]
        exposure: Option<String>,
        #[arg(long)]
        exercise: Option<String>,
        #[arg(long)]
        meds: Option<String>,

        /// Comma-separated triggers
        #[arg(long)]
        triggers: Option<String>,
        /// Comma-separated things that helped
        #[arg(long)]
        helps: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove an entry by id
    Delete {
        #[arg(long)]
        history: PathBuf,

        #[arg(long)]
        id: Uuid,
    },

    /// List entries with their ids, most recently added first
    List {
        #[arg(long)]
        history: PathBuf,
    },

    /// Remove every entry from the history
    Wipe {
        #[arg(long)]
        history: PathBuf,

        /// Confirm deleting all data
        #[arg(long)]
        yes: bool,
    },

    /// Print the dashboard summary
    Summary {
        #[arg(long)]
        history: PathBuf,

        /// Reference instant (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Scoring configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Export the history
    Export {
        #[arg(long)]
        history: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        #[arg(long, default_value = "json")]
        format: FileFormat,
    },

    /// Replace the history with the contents of an export file
    Import {
        #[arg(long)]
        history: PathBuf,

        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, default_value = "json")]
        format: FileFormat,
    },

    /// Validate an export file without importing it
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, default_value = "json")]
        format: FileFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum FileFormat {
    Json,
    Csv,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TrackCliError> {
    match cli.command {
        Commands::Add {
            history,
            date,
            mood,
            energy,
            sleep,
            sound,
            light,
            touch,
            smell,
            social,
            exposure,
            exercise,
            meds,
            triggers,
            helps,
            notes,
        } => {
            let raw = RawEntry {
                date,
                mood: text_value(mood),
                energy: text_value(energy),
                sleep: text_value(sleep),
                sound: text_value(sound),
                light: text_value(light),
                touch: text_value(touch),
                smell: text_value(smell),
                social,
                exposure,
                exercise: text_value(exercise),
                meds,
                triggers,
                helps,
                notes,
            };
            cmd_add(&history, &raw)
        }

        Commands::Delete { history, id } => cmd_delete(&history, id),

        Commands::List { history } => cmd_list(&history),

        Commands::Wipe { history, yes } => cmd_wipe(&history, yes),

        Commands::Summary {
            history,
            now,
            config,
            output_format,
        } => cmd_summary(&history, now, config.as_deref(), output_format),

        Commands::Export {
            history,
            output,
            format,
        } => cmd_export(&history, &output, format),

        Commands::Import {
            history,
            input,
            format,
        } => cmd_import(&history, &input, format),

        Commands::Validate {
            input,
            format,
            json,
        } => cmd_validate(&input, format, json),
    }
}

fn cmd_add(history_path: &Path, raw: &RawEntry) -> Result<(), TrackCliError> {
    let mut history = load_history_or_empty(history_path)?;
    let entry = Entry::from_raw(raw, Utc::now().date_naive())?;
    let date = entry.date;

    match history.upsert(entry) {
        UpsertOutcome::Inserted(id) => println!("Added entry {} for {}", id, date),
        UpsertOutcome::Replaced(id) => println!("Replaced entry {} for {}", id, date),
    }

    save_history(history_path, &history)
}

fn cmd_delete(history_path: &Path, id: Uuid) -> Result<(), TrackCliError> {
    let mut history = load_history(history_path)?;

    let removed = history.delete(id).ok_or(TrackCliError::EntryNotFound(id))?;
    println!("Deleted entry {} for {}", removed.id, removed.date);

    save_history(history_path, &history)
}

fn cmd_list(history_path: &Path) -> Result<(), TrackCliError> {
    let history = load_history(history_path)?;

    if history.is_empty() {
        println!("No entries yet.");
        return Ok(());
    }

    println!(
        "{:<10}  {:>4}  {:>6}  {:<12}  {:<24}  {:<24}  ID",
        "DATE", "MOOD", "ENERGY", "SOCIAL", "TRIGGERS", "HELPS"
    );
    for e in history.newest_first() {
        println!(
            "{:<10}  {:>4}  {:>6}  {:<12}  {:<24}  {:<24}  {}",
            e.date,
            e.mood,
            e.energy,
            e.social.as_str(),
            e.triggers.join(", "),
            e.helps.join(", "),
            e.id
        );
    }

    Ok(())
}

fn cmd_wipe(history_path: &Path, confirmed: bool) -> Result<(), TrackCliError> {
    if !confirmed {
        return Err(TrackCliError::WipeNotConfirmed);
    }

    let mut history = load_history_or_empty(history_path)?;
    let removed = history.len();
    history.clear();
    println!("Removed {} entries", removed);

    save_history(history_path, &history)
}

fn cmd_summary(
    history_path: &Path,
    now: Option<DateTime<Utc>>,
    config: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), TrackCliError> {
    let history = load_history(history_path)?;

    let engine = match config {
        Some(path) => {
            debug!("loading scoring config from {}", path.display());
            TrackerEngine::from_config_json(&fs::read_to_string(path)?)?
        }
        None => TrackerEngine::default(),
    };

    let summary = engine.summarize_history(&history, now.unwrap_or_else(Utc::now));

    match output_format {
        OutputFormat::Text => print_summary(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string(&summary)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn cmd_export(history_path: &Path, output: &Path, format: FileFormat) -> Result<(), TrackCliError> {
    let history = load_history(history_path)?;

    let data = match format {
        FileFormat::Json => export_json(&history)? + "\n",
        FileFormat::Csv => export_csv(&history)?,
    };

    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
        info!("exported {} entries to {}", history.len(), output.display());
    }

    Ok(())
}

fn cmd_import(history_path: &Path, input: &Path, format: FileFormat) -> Result<(), TrackCliError> {
    let data = read_input(input)?;

    // parse fully before touching the history file
    let imported = parse_export(&data, format)?;
    save_history(history_path, &imported)?;

    println!("Imported {} entries", imported.len());
    Ok(())
}

fn cmd_validate(input: &Path, format: FileFormat, json: bool) -> Result<(), TrackCliError> {
    let data = read_input(input)?;

    let report = match parse_export(&data, format) {
        Ok(history) => ValidationReport {
            valid: true,
            entries: history.len(),
            error: None,
        },
        Err(e) => ValidationReport {
            valid: false,
            entries: 0,
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Valid:   {}", if report.valid { "yes" } else { "no" });
        println!("Entries: {}", report.entries);
        if let Some(error) = &report.error {
            println!("Error:   {}", error);
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(TrackCliError::ValidationFailed)
    }
}

// Helper functions

fn print_summary(summary: &DashboardSummary) {
    println!("{} {} Summary", PRODUCER_NAME, ENGINE_VERSION);
    println!("==========================");
    println!("Computed at: {}", summary.computed_at_utc.to_rfc3339());
    println!(
        "Window:      last {} days ({} entries)",
        summary.window_days, summary.window.window_size
    );

    let score = match summary.risk.score {
        RiskScore::Score(v) => format!("{}/10", v),
        RiskScore::NoData => "-".to_string(),
    };
    println!("Risk:        {} ({})", score, summary.risk.rationale_text());

    let mood = summary
        .average_mood
        .map(|m| format!("{:.1}", m))
        .unwrap_or_else(|| "-".to_string());
    println!("Avg mood:    {}", mood);

    match &summary.triggers.top_trigger {
        Some(trigger) => {
            println!(
                "Top trigger: {} ({}x)",
                trigger, summary.triggers.count
            );
            println!("Tip:         {}", summary.triggers.tip);
        }
        None => println!("Top trigger: -"),
    }

    if !summary.trends.is_empty() {
        println!("\nTrends:");
        for point in &summary.trends {
            println!(
                "  {}  mood {:>4.1}  sensitivity {:>4.1}",
                point.date, point.mood, point.sensitivity
            );
        }
    }
}

fn text_value(value: Option<String>) -> serde_json::Value {
    value
        .map(serde_json::Value::String)
        .unwrap_or(serde_json::Value::Null)
}

fn parse_export(data: &str, format: FileFormat) -> Result<History, TrackError> {
    match format {
        FileFormat::Json => import_json(data),
        FileFormat::Csv => import_csv(data),
    }
}

fn read_input(input: &Path) -> Result<String, TrackCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn load_history(path: &Path) -> Result<History, TrackCliError> {
    let data = fs::read_to_string(path)?;
    Ok(import_json(&data)?)
}

fn load_history_or_empty(path: &Path) -> Result<History, TrackCliError> {
    if path.exists() {
        load_history(path)
    } else {
        debug!("{} does not exist, starting an empty history", path.display());
        Ok(History::new())
    }
}

fn save_history(path: &Path, history: &History) -> Result<(), TrackCliError> {
    fs::write(path, export_json(history)? + "\n")?;
    debug!("wrote {} entries to {}", history.len(), path.display());
    Ok(())
}

// Error types

#[derive(Debug)]
enum TrackCliError {
    Io(io::Error),
    Track(TrackError),
    Json(serde_json::Error),
    EntryNotFound(Uuid),
    WipeNotConfirmed,
    ValidationFailed,
}

impl From<io::Error> for TrackCliError {
    fn from(e: io::Error) -> Self {
        TrackCliError::Io(e)
    }
}

impl From<TrackError> for TrackCliError {
    fn from(e: TrackError) -> Self {
        TrackCliError::Track(e)
    }
}

impl From<serde_json::Error> for TrackCliError {
    fn from(e: serde_json::Error) -> Self {
        TrackCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TrackCliError> for CliError {
    fn from(e: TrackCliError) -> Self {
        match e {
            TrackCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TrackCliError::Track(e) => {
                let (code, hint) = match &e {
                    TrackError::InvalidDate(_) => ("INVALID_DATE", "Use the YYYY-MM-DD format"),
                    TrackError::DuplicateDate(_) => {
                        ("DUPLICATE_DATE", "Each date may appear only once")
                    }
                    TrackError::InvalidImport(_) | TrackError::CsvError { .. } => {
                        ("INVALID_IMPORT", "Run 'neurotrack validate' for details")
                    }
                    TrackError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    TrackError::ConfigError(_) => ("CONFIG_ERROR", "Check the scoring config file"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            TrackCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TrackCliError::EntryNotFound(id) => CliError {
                code: "ENTRY_NOT_FOUND".to_string(),
                message: format!("No entry with id {}", id),
                hint: Some("Run 'neurotrack list' to see entry ids".to_string()),
            },
            TrackCliError::WipeNotConfirmed => CliError {
                code: "WIPE_NOT_CONFIRMED".to_string(),
                message: "Refusing to delete all data without confirmation".to_string(),
                hint: Some("Pass --yes to confirm".to_string()),
            },
            TrackCliError::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Input failed validation".to_string(),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    valid: bool,
    entries: usize,
    error: Option<String>,
}
