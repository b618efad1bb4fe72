//! Statistics calculation engine.
//!
//! Computes derived metrics from a player's match history:
//! - Volume, rolling averages, percentiles, deltas, and tilt detection
//! - Roster-wide consolidation
//! - Elo threshold cycles
//! - Period progress, volume/progress correlation, and play patterns
//! - Rating timelines
//!
//! Everything here is a pure function over in-memory records.

mod account;
mod cycles;
mod history;
mod patterns;
mod progress;
mod tilt;
mod timeline;

pub use account::{
    compute_consolidated_stats, compute_consolidated_stats_at, compute_per_account_stats,
    compute_per_account_stats_at, percentile,
};
pub use cycles::{compute_cycles, CYCLE_THRESHOLDS};
pub use history::build_player_history;
pub use patterns::{analyze_game_patterns, analyze_game_patterns_in};
pub use progress::{
    calculate_period_progress, calculate_volume_progress_correlation, pearson_correlation,
};
pub use tilt::detect_tilt_streaks;
pub use timeline::compute_timeline;

pub(crate) const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
pub(crate) const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Win rate as a percentage of games played.
pub fn calculate_win_rate(wins: usize, games: usize) -> f64 {
    if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64 * 100.0
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean, or `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_win_rate() {
        assert!((calculate_win_rate(5, 6) - 83.333).abs() < 0.01);
        assert_eq!(calculate_win_rate(0, 0), 0.0);
        assert_eq!(calculate_win_rate(3, 6), 50.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(66.666, 1), 66.7);
        assert_eq!(round_to(1.005, 0), 1.0);
        assert_eq!(round_to(-3.14159, 2), -3.14);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1000.0, 1100.0]), Some(1050.0));
    }
}
