//! FFI bindings for NeuroTrack
//!
//! This module provides C-compatible functions for calling the engine from other
//! languages. Histories cross the boundary as JSON exports. All functions use C
//! strings (null-terminated) and return allocated memory that must be freed by
//! the caller using `neurotrack_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{DateTime, Utc};

use crate::exchange::{export_csv, export_json, import_json};
use crate::pipeline::TrackerEngine;
use crate::types::{Entry, RawEntry};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Reference instant from an optional RFC 3339 string; NULL means now
unsafe fn reference_time(now_rfc3339: *const c_char) -> Result<DateTime<Utc>, String> {
    if now_rfc3339.is_null() {
        return Ok(Utc::now());
    }
    let text = cstr_to_string(now_rfc3339).ok_or("Invalid timestamp string pointer")?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp {text:?}: {e}"))
}

/// Reports a failure and returns NULL
fn fail(msg: &str) -> *mut c_char {
    set_last_error(msg);
    ptr::null_mut()
}

// ============================================================================
// Engine API
// ============================================================================

/// Summarize a JSON history and return the dashboard summary as JSON.
///
/// # Safety
/// - `history_json` must be a valid null-terminated C string.
/// - `now_rfc3339` must be NULL (use the current time) or a valid C string.
/// - `config_json` must be NULL (default configuration) or a valid C string.
/// - Returns a newly allocated string that must be freed with `neurotrack_free_string`.
/// - Returns NULL on error; call `neurotrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn neurotrack_summarize(
    history_json: *const c_char,
    now_rfc3339: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(json) = cstr_to_string(history_json) else {
        return fail("Invalid history string pointer");
    };

    let now = match reference_time(now_rfc3339) {
        Ok(now) => now,
        Err(e) => return fail(&e),
    };

    let engine = if config_json.is_null() {
        TrackerEngine::default()
    } else {
        let Some(config) = cstr_to_string(config_json) else {
            return fail("Invalid config string pointer");
        };
        match TrackerEngine::from_config_json(&config) {
            Ok(engine) => engine,
            Err(e) => return fail(&e.to_string()),
        }
    };

    let history = match import_json(&json) {
        Ok(history) => history,
        Err(e) => return fail(&e.to_string()),
    };

    match serde_json::to_string(&engine.summarize_history(&history, now)) {
        Ok(summary) => string_to_cstr(&summary),
        Err(e) => fail(&e.to_string()),
    }
}

/// Build an entry from raw form JSON and upsert it into a JSON history.
///
/// Returns the updated history as JSON. A same-date entry is replaced and keeps
/// its id.
///
/// # Safety
/// - `history_json` and `raw_entry_json` must be valid null-terminated C strings.
/// - `now_rfc3339` must be NULL (use the current time) or a valid C string; its
///   UTC date is used when the raw entry has no date.
/// - Returns a newly allocated string that must be freed with `neurotrack_free_string`.
/// - Returns NULL on error; call `neurotrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn neurotrack_upsert_entry(
    history_json: *const c_char,
    raw_entry_json: *const c_char,
    now_rfc3339: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(json) = cstr_to_string(history_json) else {
        return fail("Invalid history string pointer");
    };
    let Some(raw_json) = cstr_to_string(raw_entry_json) else {
        return fail("Invalid entry string pointer");
    };
    let now = match reference_time(now_rfc3339) {
        Ok(now) => now,
        Err(e) => return fail(&e),
    };

    let mut history = match import_json(&json) {
        Ok(history) => history,
        Err(e) => return fail(&e.to_string()),
    };

    let raw: RawEntry = match serde_json::from_str(&raw_json) {
        Ok(raw) => raw,
        Err(e) => return fail(&format!("Invalid entry JSON: {e}")),
    };

    match Entry::from_raw(&raw, now.date_naive()) {
        Ok(entry) => {
            history.upsert(entry);
        }
        Err(e) => return fail(&e.to_string()),
    }

    match export_json(&history) {
        Ok(updated) => string_to_cstr(&updated),
        Err(e) => fail(&e.to_string()),
    }
}

/// Convert a JSON history into the CSV export format.
///
/// # Safety
/// - `history_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `neurotrack_free_string`.
/// - Returns NULL on error; call `neurotrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn neurotrack_export_csv(history_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(json) = cstr_to_string(history_json) else {
        return fail("Invalid history string pointer");
    };

    match import_json(&json).and_then(|history| export_csv(&history)) {
        Ok(csv) => string_to_cstr(&csv),
        Err(e) => fail(&e.to_string()),
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by NeuroTrack functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a NeuroTrack function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn neurotrack_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next NeuroTrack call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn neurotrack_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn neurotrack_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
