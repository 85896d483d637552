//! Toolkit warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple
//! times. Used by the document, layout, and render components to report
//! inputs they cannot honor (an unbalanced node bracket, a degenerate
//! quad, a restart with nothing to shrink).

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported input (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Layout", "end_node called with no matching begin_node");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[Numbat {component}] ⚠ {message}{RESET}");
    }
}

/// Number of distinct warnings recorded since the last clear.
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
#[must_use]
pub fn warning_count() -> usize {
    WARNED.lock().unwrap().as_ref().map_or(0, HashSet::len)
}

/// Clear all recorded warnings (call when starting a new document)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The warning store is process-global, so one test owns it.
    #[test]
    fn duplicate_warnings_count_once() {
        clear_warnings();
        warn_once("Test", "repeated message");
        warn_once("Test", "repeated message");
        warn_once("Test", "a different message");
        assert_eq!(warning_count(), 2);
        clear_warnings();
        assert_eq!(warning_count(), 0);
    }
}
