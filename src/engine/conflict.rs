use crate::model::*;

use super::EngineError;

/// Reject `candidate` if adding it to `existing` would put more than `limit`
/// bookings inside any window `[t, t + window_minutes)` anchored at a time
/// present in the combined set. `existing` must be sorted ascending.
///
/// Every anchor is checked, not just the candidate's own: four bookings at
/// 10:00 plus a candidate at 10:30 overflow the 10:00 window.
pub(crate) fn check_capacity(
    existing: &[TimeOfDay],
    candidate: TimeOfDay,
    limit: usize,
    window_minutes: u16,
) -> Result<(), EngineError> {
    let times = with_candidate(existing, candidate);
    if peak_window_load(&times, window_minutes) > limit {
        return Err(EngineError::CapacityConflict { limit });
    }
    Ok(())
}

/// Copy of `sorted` with `candidate` placed after any equal entries.
fn with_candidate(sorted: &[TimeOfDay], candidate: TimeOfDay) -> Vec<TimeOfDay> {
    debug_assert!(sorted.is_sorted(), "booking times must be sorted");
    let pos = sorted.partition_point(|t| *t <= candidate);
    let mut times = Vec::with_capacity(sorted.len() + 1);
    times.extend_from_slice(&sorted[..pos]);
    times.push(candidate);
    times.extend_from_slice(&sorted[pos..]);
    times
}

/// Largest number of entries in `[t, t + window_minutes)` over every distinct
/// `t` in `sorted`. Two-pointer sweep, O(n).
pub fn peak_window_load(sorted: &[TimeOfDay], window_minutes: u16) -> usize {
    let mut peak = 0;
    let mut end = 0;
    for (start, anchor) in sorted.iter().enumerate() {
        if start > 0 && sorted[start - 1] == *anchor {
            continue;
        }
        let window_end = anchor.window_end(window_minutes);
        end = end.max(start);
        while end < sorted.len() && sorted[end].minutes() < window_end {
            end += 1;
        }
        peak = peak.max(end - start);
    }
    peak
}
