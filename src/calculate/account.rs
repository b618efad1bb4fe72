//! Per-account statistics and roster-wide consolidation.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use super::tilt::detect_tilt_streaks;
use super::{mean, SECONDS_PER_DAY};
use crate::models::{
    sort_by_ended_at, ConsolidatedStats, Deltas, MatchRecord, Percentiles, ProfileId,
    RollingAverages, StatsBundle, Volume,
};

/// Only the most recent matches feed the percentile computation.
const PERCENTILE_WINDOW: usize = 200;

/// Compute the stats bundle for one account's matches, in any order.
///
/// Volume windows are measured against the current wall-clock time.
pub fn compute_per_account_stats(matches: &[MatchRecord]) -> StatsBundle {
    compute_per_account_stats_at(matches, Utc::now().timestamp())
}

/// Same as [`compute_per_account_stats`] with an explicit `now` (epoch seconds).
pub fn compute_per_account_stats_at(matches: &[MatchRecord], now: i64) -> StatsBundle {
    let sorted = sort_by_ended_at(matches);
    stats_for_sorted(&sorted, now)
}

/// Compute per-account bundles plus one bundle over every account's matches
/// combined into a single timeline.
pub fn compute_consolidated_stats(
    matches_by_account: &BTreeMap<ProfileId, Vec<MatchRecord>>,
) -> ConsolidatedStats {
    compute_consolidated_stats_at(matches_by_account, Utc::now().timestamp())
}

/// Same as [`compute_consolidated_stats`] with an explicit `now`.
pub fn compute_consolidated_stats_at(
    matches_by_account: &BTreeMap<ProfileId, Vec<MatchRecord>>,
    now: i64,
) -> ConsolidatedStats {
    let by_account: BTreeMap<ProfileId, StatsBundle> = matches_by_account
        .iter()
        .map(|(id, matches)| (*id, compute_per_account_stats_at(matches, now)))
        .collect();

    let mut union: Vec<&MatchRecord> = matches_by_account.values().flatten().collect();
    union.sort_by_key(|m| m.ended_at);

    debug!(
        "Consolidated {} matches across {} accounts",
        union.len(),
        by_account.len()
    );

    ConsolidatedStats {
        by_account,
        consolidated: stats_for_sorted(&union, now),
    }
}

fn stats_for_sorted(sorted: &[&MatchRecord], now: i64) -> StatsBundle {
    if sorted.is_empty() {
        return StatsBundle::empty();
    }

    StatsBundle {
        volume: volume(sorted, now),
        rolling_avg: RollingAverages {
            g10: rolling_average(sorted, 10),
            g20: rolling_average(sorted, 20),
            g30: rolling_average(sorted, 30),
            g50: rolling_average(sorted, 50),
            g100: rolling_average(sorted, 100),
        },
        percentiles: rating_percentiles(sorted),
        delta: Deltas {
            g10: delta(sorted, 10),
            g20: delta(sorted, 20),
            g30: delta(sorted, 30),
        },
        tilt: detect_tilt_streaks(sorted),
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn volume(sorted: &[&MatchRecord], now: i64) -> Volume {
    let week_ago = now - 7 * SECONDS_PER_DAY;
    let month_ago = now - 30 * SECONDS_PER_DAY;

    Volume {
        week: sorted.iter().filter(|m| m.ended_at >= week_ago).count(),
        month: sorted.iter().filter(|m| m.ended_at >= month_ago).count(),
    }
}

fn rolling_average(sorted: &[&MatchRecord], n: usize) -> Option<f64> {
    let ratings: Vec<f64> = tail(sorted, n)
        .iter()
        .filter_map(|m| m.rating_after())
        .collect();
    mean(&ratings)
}

fn rating_percentiles(sorted: &[&MatchRecord]) -> Percentiles {
    let mut ratings: Vec<f64> = tail(sorted, PERCENTILE_WINDOW)
        .iter()
        .filter_map(|m| m.rating_after())
        .collect();
    ratings.sort_by(f64::total_cmp);

    let at = |p: f64| percentile(&ratings, p).map(|v| v.round() as i64);
    Percentiles {
        p25: at(25.0),
        p50: at(50.0),
        p75: at(75.0),
    }
}

/// Percentile of an ascending-sorted slice, interpolating linearly between
/// the two nearest order statistics.
///
/// `p` is clamped to `0.0..=100.0`. A NaN `p` yields `None`.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || p.is_nan() {
        return None;
    }

    let index = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        return Some(sorted[lower]);
    }

    let weight = index - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Rating of the latest match minus the rating `n` matches before it.
fn delta(sorted: &[&MatchRecord], n: usize) -> Option<f64> {
    if sorted.len() <= n {
        return None;
    }

    let last = sorted.len() - 1;
    let current = sorted[last].rating_after()?;
    let previous = sorted[last - n].rating_after()?;
    Some(current - previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TiltKind;
    use pretty_assertions::assert_eq;

    const NOW: i64 = 1_760_000_000;

    fn rated(id: usize, ended_at: i64, rating: f64) -> MatchRecord {
        MatchRecord::new(format!("m{}", id), 1, ended_at).with_rating_after(rating)
    }

    /// `count` matches one hour apart ending at NOW, ratings from `rating_of`.
    fn history(count: usize, rating_of: impl Fn(usize) -> f64) -> Vec<MatchRecord> {
        (0..count)
            .map(|i| rated(i, NOW - (count - i) as i64 * 3600, rating_of(i)))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_bundle() {
        let stats = compute_per_account_stats(&[]);

        assert_eq!(stats, StatsBundle::empty());
        assert_eq!(stats.volume, Volume { week: 0, month: 0 });
        assert_eq!(stats.rolling_avg.g10, None);
        assert_eq!(stats.percentiles.p50, None);
        assert_eq!(stats.delta.g10, None);
        assert!(stats.tilt.is_empty());
    }

    #[test]
    fn test_volume_windows() {
        let day = SECONDS_PER_DAY;
        let matches = vec![
            rated(0, NOW - day, 1500.0),
            rated(1, NOW - 7 * day, 1500.0),
            rated(2, NOW - 7 * day - 1, 1500.0),
            rated(3, NOW - 29 * day, 1500.0),
            rated(4, NOW - 31 * day, 1500.0),
        ];

        let stats = compute_per_account_stats_at(&matches, NOW);
        assert_eq!(stats.volume, Volume { week: 2, month: 4 });
    }

    #[test]
    fn test_rolling_average_uses_most_recent_matches() {
        // 15 matches: the first five at 1000, the last ten at 1100.
        let matches = history(15, |i| if i < 5 { 1000.0 } else { 1100.0 });
        let stats = compute_per_account_stats_at(&matches, NOW);

        assert_eq!(stats.rolling_avg.g10, Some(1100.0));
        // Fewer than 20 matches: averages over all 15.
        let expected = (5.0 * 1000.0 + 10.0 * 1100.0) / 15.0;
        assert_eq!(stats.rolling_avg.g20, Some(expected));
        assert_eq!(stats.rolling_avg.g100, Some(expected));
    }

    #[test]
    fn test_rolling_average_sorts_input_first() {
        let mut matches = history(12, |i| 1000.0 + i as f64);
        matches.reverse();
        let stats = compute_per_account_stats_at(&matches, NOW);

        // Last ten chronologically are ratings 1002..=1011.
        assert_eq!(stats.rolling_avg.g10, Some(1006.5));
    }

    #[test]
    fn test_rolling_average_skips_missing_ratings() {
        let mut matches = history(4, |_| 1200.0);
        matches[3].rating_after = None;
        matches[2].rating_after = Some(f64::NAN);
        matches[1].rating_after = Some(1300.0);

        let stats = compute_per_account_stats_at(&matches, NOW);
        assert_eq!(stats.rolling_avg.g10, Some(1250.0));
    }

    #[test]
    fn test_rolling_average_null_without_ratings() {
        let matches: Vec<MatchRecord> = (0..5)
            .map(|i| MatchRecord::new(format!("m{}", i), 1, NOW - i))
            .collect();

        let stats = compute_per_account_stats_at(&matches, NOW);
        assert_eq!(stats.volume.week, 5);
        assert_eq!(stats.rolling_avg, RollingAverages::default());
        assert_eq!(stats.percentiles, Percentiles::default());
    }

    #[test]
    fn test_uniform_ratings_percentiles() {
        let matches = history(30, |_| 1000.0);
        let stats = compute_per_account_stats_at(&matches, NOW);

        assert_eq!(
            stats.percentiles,
            Percentiles {
                p25: Some(1000),
                p50: Some(1000),
                p75: Some(1000),
            }
        );
    }

    #[test]
    fn test_percentiles_interpolate() {
        let matches = history(4, |i| 1000.0 + 100.0 * i as f64);
        let stats = compute_per_account_stats_at(&matches, NOW);

        assert_eq!(stats.percentiles.p25, Some(1075));
        assert_eq!(stats.percentiles.p50, Some(1150));
        assert_eq!(stats.percentiles.p75, Some(1225));
    }

    #[test]
    fn test_percentiles_only_use_last_200() {
        let matches = history(250, |i| if i < 50 { 500.0 } else { 1500.0 });
        let stats = compute_per_account_stats_at(&matches, NOW);

        assert_eq!(stats.percentiles.p25, Some(1500));
    }

    #[test]
    fn test_percentiles_idempotent_under_resorting() {
        let matches = history(40, |i| 1000.0 + ((i * 37) % 11) as f64 * 10.0);
        let once = compute_per_account_stats_at(&matches, NOW);

        let mut shuffled = matches.clone();
        shuffled.reverse();
        let twice = compute_per_account_stats_at(&shuffled, NOW);

        assert_eq!(once.percentiles, twice.percentiles);
    }

    #[test]
    fn test_percentile_helper() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[42.0], 75.0), Some(42.0));
        assert_eq!(percentile(&[1.0, 2.0, 3.0], 50.0), Some(2.0));
        assert_eq!(percentile(&[1.0, 2.0], 50.0), Some(1.5));
    }

    #[test]
    fn test_percentile_out_of_range() {
        let sorted = [1.0, 2.0, 3.0];

        assert_eq!(percentile(&sorted, 150.0), Some(3.0));
        assert_eq!(percentile(&sorted, f64::INFINITY), Some(3.0));
        assert_eq!(percentile(&sorted, -10.0), Some(1.0));
        assert_eq!(percentile(&sorted, f64::NAN), None);
    }

    #[test]
    fn test_delta_monotonic_sequence() {
        let matches = history(35, |i| 1000.0 + 10.0 * i as f64);
        let stats = compute_per_account_stats_at(&matches, NOW);
        let last = matches.len() - 1;
        let rating = |i: usize| matches[i].rating_after.unwrap();

        assert_eq!(stats.delta.g10, Some(rating(last) - rating(last - 10)));
        assert_eq!(stats.delta.g20, Some(200.0));
        assert_eq!(stats.delta.g30, Some(300.0));
    }

    #[test]
    fn test_delta_requires_enough_history() {
        let matches = history(15, |i| 1000.0 + i as f64);
        let stats = compute_per_account_stats_at(&matches, NOW);

        assert_eq!(stats.delta.g10, Some(10.0));
        assert_eq!(stats.delta.g20, None);
        assert_eq!(stats.delta.g30, None);
    }

    #[test]
    fn test_delta_null_when_endpoint_unrated() {
        let mut matches = history(12, |i| 1000.0 + i as f64);
        matches[1].rating_after = None;

        let stats = compute_per_account_stats_at(&matches, NOW);
        assert_eq!(stats.delta.g10, None);
    }

    #[test]
    fn test_tilt_included_in_bundle() {
        let matches: Vec<MatchRecord> = (0..4)
            .map(|i| MatchRecord::new(format!("m{}", i), 1, NOW - 100 + i).with_result(false))
            .collect();

        let stats = compute_per_account_stats_at(&matches, NOW);
        assert_eq!(stats.tilt.len(), 1);
        assert_eq!(stats.tilt[0].kind, TiltKind::LossStreak);
        assert_eq!(stats.tilt[0].losses, 4);
    }

    #[test]
    fn test_consolidated_combines_timelines() {
        let mut by_account = BTreeMap::new();
        by_account.insert(
            1,
            vec![rated(0, NOW - 100, 1000.0), rated(1, NOW - 50, 1020.0)],
        );
        by_account.insert(2, vec![rated(2, NOW - 75, 1500.0)]);
        by_account.insert(3, vec![]);

        let result = compute_consolidated_stats_at(&by_account, NOW);

        assert_eq!(result.by_account.len(), 3);
        assert_eq!(result.by_account[&1].volume.week, 2);
        assert_eq!(result.by_account[&2].rolling_avg.g10, Some(1500.0));
        assert_eq!(result.by_account[&3], StatsBundle::empty());

        assert_eq!(result.consolidated.volume.week, 3);
        assert_eq!(
            result.consolidated.rolling_avg.g10,
            Some((1000.0 + 1020.0 + 1500.0) / 3.0)
        );
        // Latest overall match is account 1's at 1020.
        assert_eq!(result.consolidated.percentiles.p50, Some(1020));
    }

    #[test]
    fn test_consolidated_empty_roster() {
        let result = compute_consolidated_stats(&BTreeMap::new());
        assert!(result.by_account.is_empty());
        assert_eq!(result.consolidated, StatsBundle::empty());
    }
}
