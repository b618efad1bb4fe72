//! Composed history report for a single player.

use tracing::debug;

use crate::models::{
    HistoryQuery, MatchRecord, PlayerHistory, ProfileId, ProgressWindows, SortOrder,
};

use super::{
    analyze_game_patterns, calculate_period_progress, calculate_volume_progress_correlation,
    compute_per_account_stats_at, SECONDS_PER_DAY,
};

/// Build the history report for `profile_id` as of `now` (epoch seconds).
///
/// `matches` may contain other players' records; they are ignored. The query's
/// `from`/`to` bounds are inclusive, and `limit` keeps the most recent matches.
/// The nickname is left for the caller to fill in from the roster.
pub fn build_player_history(
    profile_id: ProfileId,
    matches: &[MatchRecord],
    query: &HistoryQuery,
    now: i64,
) -> PlayerHistory {
    let mut selected: Vec<MatchRecord> = matches
        .iter()
        .filter(|m| m.profile_id == profile_id)
        .filter(|m| query.from.map_or(true, |from| m.ended_at >= from))
        .filter(|m| query.to.map_or(true, |to| m.ended_at <= to))
        .cloned()
        .collect();

    // Newest first so the limit keeps the most recent games.
    selected.sort_by_key(|m| std::cmp::Reverse(m.ended_at));
    if let Some(limit) = query.limit.filter(|&l| l > 0) {
        selected.truncate(limit);
    }
    selected.reverse();

    debug!(profile_id, selected = selected.len(), "Building player history");

    let window = |days: i64| {
        calculate_period_progress(&selected, Some(now - days * SECONDS_PER_DAY), Some(now))
    };
    let progress = ProgressWindows {
        last_week: window(7),
        last_month: window(30),
        last_quarter: window(90),
        overall: calculate_period_progress(&selected, None, None),
    };

    let stats = compute_per_account_stats_at(&selected, now);
    let volume_progress_correlation = calculate_volume_progress_correlation(&selected);
    let game_patterns = analyze_game_patterns(&selected);

    if query.sort == SortOrder::Desc {
        selected.reverse();
    }

    PlayerHistory {
        profile_id,
        nick: None,
        total_matches: selected.len(),
        matches: selected,
        stats,
        progress,
        volume_progress_correlation,
        game_patterns,
        period: query.clone(),
    }
}
