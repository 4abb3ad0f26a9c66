//! FFI bindings for Bloom Core
//!
//! This module provides C-compatible functions for calling the cycle predictor
//! and the reply engine from the host app. All functions use C strings
//! (null-terminated) and return allocated memory that must be freed by the
//! caller using `bloom_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::chat::{ChatContext, ChatSession, ReplyEngine};
use crate::cycle::{self, parse_date, CycleHistory};
use crate::error::CycleError;

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

/// Convert a result into an allocated C string, recording any error
fn result_to_cstr(result: Result<String, CycleError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

fn predict_json(history_json: &str, today: &str) -> Result<String, CycleError> {
    let history = CycleHistory::parse_array(history_json)?;
    let prediction = cycle::predict(&history, parse_date(today)?)?;
    Ok(serde_json::to_string(&prediction)?)
}

fn calendar_json(history_json: &str, from: &str, to: &str) -> Result<String, CycleError> {
    let history = CycleHistory::parse_array(history_json)?;
    let days = cycle::calendar(&history, parse_date(from)?, parse_date(to)?)?;
    Ok(serde_json::to_string(&days)?)
}

fn stats_json(history_json: &str) -> Result<String, CycleError> {
    let history = CycleHistory::parse_array(history_json)?;
    Ok(serde_json::to_string(&cycle::cycle_stats(&history))?)
}

// ============================================================================
// Cycle API
// ============================================================================

/// Predict the current phase and next period.
///
/// `history_json` is a JSON array of `{"start_date": "YYYY-MM-DD", "period_length": n}`.
///
/// # Safety
/// - `history_json` and `today` must be valid null-terminated C strings.
/// - Returns a newly allocated JSON string that must be freed with `bloom_free_string`.
/// - Returns NULL on error (including empty history); call `bloom_last_error`.
#[no_mangle]
pub unsafe extern "C" fn bloom_cycle_predict(
    history_json: *const c_char,
    today: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(history_str) = cstr_to_string(history_json) else {
        set_last_error("Invalid history string pointer");
        return ptr::null_mut();
    };
    let Some(today_str) = cstr_to_string(today) else {
        set_last_error("Invalid date string pointer");
        return ptr::null_mut();
    };

    result_to_cstr(predict_json(&history_str, &today_str))
}

/// Classify every day in `from..=to`.
///
/// # Safety
/// - All arguments must be valid null-terminated C strings.
/// - Returns a newly allocated JSON array that must be freed with `bloom_free_string`.
/// - Returns NULL on error; call `bloom_last_error`.
#[no_mangle]
pub unsafe extern "C" fn bloom_cycle_calendar(
    history_json: *const c_char,
    from: *const c_char,
    to: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(history_str) = cstr_to_string(history_json) else {
        set_last_error("Invalid history string pointer");
        return ptr::null_mut();
    };
    let (Some(from_str), Some(to_str)) = (cstr_to_string(from), cstr_to_string(to)) else {
        set_last_error("Invalid date string pointer");
        return ptr::null_mut();
    };

    result_to_cstr(calendar_json(&history_str, &from_str, &to_str))
}

/// Compute statistics over the whole history.
///
/// # Safety
/// - `history_json` must be a valid null-terminated C string.
/// - Returns a newly allocated JSON string that must be freed with `bloom_free_string`.
/// - Returns NULL on error; call `bloom_last_error`.
#[no_mangle]
pub unsafe extern "C" fn bloom_cycle_stats(history_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(history_str) = cstr_to_string(history_json) else {
        set_last_error("Invalid history string pointer");
        return ptr::null_mut();
    };

    result_to_cstr(stats_json(&history_str))
}

// ============================================================================
// Chat Session API
// ============================================================================

/// Opaque handle to a chat session and its reply engine
pub struct ChatSessionHandle {
    engine: ReplyEngine,
    session: ChatSession,
}

/// Create a new chat session.
///
/// A `seed` of 0 seeds the engine from OS entropy; any other value makes
/// random choices reproducible.
///
/// # Safety
/// - Returns a pointer to a newly allocated session.
/// - Must be freed with `bloom_chat_session_free`.
#[no_mangle]
pub unsafe extern "C" fn bloom_chat_session_new(seed: u64) -> *mut ChatSessionHandle {
    clear_last_error();

    let engine = if seed == 0 {
        ReplyEngine::new()
    } else {
        ReplyEngine::with_seed(seed)
    };
    let handle = Box::new(ChatSessionHandle {
        engine,
        session: ChatSession::new(),
    });
    Box::into_raw(handle)
}

/// Free a chat session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `bloom_chat_session_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn bloom_chat_session_free(session: *mut ChatSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Reply to a message within a session.
///
/// `context_json` is a JSON `ChatContext`; missing fields mean "not logged".
///
/// # Safety
/// - `session` must be a valid pointer returned by `bloom_chat_session_new`.
/// - `message` and `context_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `bloom_free_string`.
/// - Returns NULL on error; call `bloom_last_error`.
#[no_mangle]
pub unsafe extern "C" fn bloom_chat_reply(
    session: *mut ChatSessionHandle,
    message: *const c_char,
    context_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &mut *session;

    let Some(message_str) = cstr_to_string(message) else {
        set_last_error("Invalid message string pointer");
        return ptr::null_mut();
    };
    let Some(context_str) = cstr_to_string(context_json) else {
        set_last_error("Invalid context string pointer");
        return ptr::null_mut();
    };

    let ctx = match ChatContext::from_json(&context_str) {
        Ok(ctx) => ctx,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let reply = handle
        .engine
        .reply_in_session(&message_str, &ctx, &mut handle.session);
    string_to_cstr(&reply)
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Bloom functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Bloom function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn bloom_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Bloom function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn bloom_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn bloom_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_history() -> CString {
        CString::new(
            r#"[
                {"start_date": "2024-01-01", "period_length": 5},
                {"start_date": "2024-01-29", "period_length": 5}
            ]"#,
        )
        .unwrap()
    }

    unsafe fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        bloom_free_string(ptr);
        s
    }

    #[test]
    fn test_ffi_cycle_predict() {
        let history = sample_history();
        let today = CString::new("2024-02-01").unwrap();

        unsafe {
            let result = bloom_cycle_predict(history.as_ptr(), today.as_ptr());
            let json: serde_json::Value = serde_json::from_str(&take_string(result)).unwrap();
            assert_eq!(json["next_period_date"], "2024-02-26");
            assert_eq!(json["day_of_cycle"], 4);
            assert_eq!(json["phase"], "period");
        }
    }

    #[test]
    fn test_ffi_empty_history_reports_error() {
        let history = CString::new("[]").unwrap();
        let today = CString::new("2024-02-01").unwrap();

        unsafe {
            let result = bloom_cycle_predict(history.as_ptr(), today.as_ptr());
            assert!(result.is_null());

            let error = bloom_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("No cycle history"));
        }
    }

    #[test]
    fn test_ffi_overlong_period_reports_error() {
        let history = CString::new(
            r#"[
                {"start_date": "2024-01-01", "period_length": 3000000000},
                {"start_date": "2024-01-29", "period_length": 3000000000}
            ]"#,
        )
        .unwrap();

        unsafe {
            let result = bloom_cycle_stats(history.as_ptr());
            assert!(result.is_null());

            let error = CStr::from_ptr(bloom_last_error()).to_str().unwrap();
            assert!(error.contains("exceeds the maximum"), "unexpected error: {error}");
        }
    }

    #[test]
    fn test_ffi_calendar_and_stats() {
        let history = sample_history();
        let from = CString::new("2024-02-01").unwrap();
        let to = CString::new("2024-02-07").unwrap();

        unsafe {
            let days = take_string(bloom_cycle_calendar(history.as_ptr(), from.as_ptr(), to.as_ptr()));
            let days: serde_json::Value = serde_json::from_str(&days).unwrap();
            assert_eq!(days.as_array().unwrap().len(), 7);

            let stats = take_string(bloom_cycle_stats(history.as_ptr()));
            let stats: serde_json::Value = serde_json::from_str(&stats).unwrap();
            assert_eq!(stats["total_cycles"], 2);
        }
    }

    #[test]
    fn test_ffi_chat_session_lifecycle() {
        unsafe {
            let session = bloom_chat_session_new(42);
            assert!(!session.is_null());

            let message = CString::new("hi").unwrap();
            let context = CString::new(r#"{"user_name": "Sam"}"#).unwrap();

            let reply = take_string(bloom_chat_reply(session, message.as_ptr(), context.as_ptr()));
            assert!(reply.contains("Sam"));
            assert_eq!((*session).session.turns, 1);

            let bad_context = CString::new("not json").unwrap();
            let result = bloom_chat_reply(session, message.as_ptr(), bad_context.as_ptr());
            assert!(result.is_null());
            assert!(!bloom_last_error().is_null());

            bloom_chat_session_free(session);
        }
    }

    #[test]
    fn test_ffi_null_session() {
        let message = CString::new("hi").unwrap();
        let context = CString::new("{}").unwrap();
        unsafe {
            let result = bloom_chat_reply(ptr::null_mut(), message.as_ptr(), context.as_ptr());
            assert!(result.is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = bloom_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
