//! Elo cycle detection.

use crate::models::{sort_by_ended_at, EloCycle, MatchRecord};

use super::SECONDS_PER_DAY;

/// Rating thresholds; each adjacent pair defines one cycle.
pub const CYCLE_THRESHOLDS: [i64; 4] = [1700, 1800, 1900, 2000];

/// Find how long it took to climb between consecutive rating thresholds.
///
/// For each `(lo, hi)` pair the cycle starts at the first match rated `>= lo`
/// and ends at the first later match rated `>= hi`. Pairs with no start or no
/// end are skipped. Cycles are computed independently and may overlap.
pub fn compute_cycles(matches: &[MatchRecord]) -> Vec<EloCycle> {
    let sorted = sort_by_ended_at(matches);
    let reaches = |m: &MatchRecord, threshold: i64| {
        m.rating_after().is_some_and(|r| r >= threshold as f64)
    };

    CYCLE_THRESHOLDS
        .windows(2)
        .filter_map(|pair| {
            let (lo, hi) = (pair[0], pair[1]);

            let start = sorted.iter().position(|m| reaches(m, lo))?;
            let end = start
                + 1
                + sorted[start + 1..]
                    .iter()
                    .position(|m| reaches(m, hi))?;

            let elapsed = sorted[end].ended_at - sorted[start].ended_at;
            Some(EloCycle {
                elo_from: lo,
                elo_to: hi,
                games_in_cycle: end - start + 1,
                days_in_cycle: (elapsed as f64 / SECONDS_PER_DAY as f64).ceil() as i64,
            })
        })
        .collect()
}
