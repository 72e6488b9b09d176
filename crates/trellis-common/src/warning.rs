//! Deduplicated warnings routed through the `log` facade.
//!
//! Style resolution and box-tree construction report input they cannot
//! honour (an unknown display keyword, a block inside an inline) here. The
//! same message is only emitted once per process until [`clear_warnings`]
//! is called.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about unsupported input (emits once per unique message).
///
/// Returns `true` if the warning was emitted, `false` if it was a repeat.
///
/// # Example
/// ```ignore
/// warn_once("style", "unknown display keyword 'grid'");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .map(|mut guard| guard.get_or_insert_with(HashSet::new).insert(key))
        .unwrap_or(true);

    if first_time {
        log::warn!(target: "trellis", "[{component}] {message}");
    }
    first_time
}

/// Clear all recorded warnings (call when loading a new document).
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock()
        && let Some(set) = guard.as_mut()
    {
        set.clear();
    }
}
