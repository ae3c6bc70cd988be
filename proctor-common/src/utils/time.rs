use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current UNIX timestamp in seconds.
///
/// Every engine operation takes its timestamp as an explicit argument; this
/// helper is how callers obtain that value. Reading the clock once per
/// operation keeps all window checks within a single operation consistent.
///
/// # Panics
///
/// Panics if the system clock is set before the UNIX epoch.
pub fn current_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time is before UNIX EPOCH")
        .as_secs()
}
