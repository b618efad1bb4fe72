//! Period progress and volume-vs-progress correlation.

use std::collections::BTreeMap;

use crate::models::{
    CorrelationBand, CorrelationStatus, EfficiencyBracket, MatchRecord, PeriodProgress,
    VolumeProgressCorrelation, WeeklyStat,
};

use super::{calculate_win_rate, mean, round_to, SECONDS_PER_DAY, SECONDS_PER_WEEK};

/// Minimum history before a correlation is attempted.
const MIN_CORRELATION_MATCHES: usize = 10;

/// Minimum number of weekly buckets for a meaningful correlation.
const MIN_CORRELATION_WEEKS: usize = 3;

/// Weekly volume brackets: inclusive game-count bounds and label.
const VOLUME_BRACKETS: [(usize, usize, &str); 4] = [
    (0, 5, "Light (0-5/week)"),
    (6, 15, "Moderate (6-15/week)"),
    (16, 25, "Very active (16-25/week)"),
    (26, usize::MAX, "Extremely active (26+/week)"),
];

/// Rating progress of the matches ending within `[from_ts, to_ts]`.
///
/// Both bounds are optional and inclusive. The rating change is measured from
/// the first match's pre-match rating to the last match's post-match rating.
pub fn calculate_period_progress(
    matches: &[MatchRecord],
    from_ts: Option<i64>,
    to_ts: Option<i64>,
) -> PeriodProgress {
    let mut period: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| from_ts.map_or(true, |from| m.ended_at >= from))
        .filter(|m| to_ts.map_or(true, |to| m.ended_at <= to))
        .collect();
    period.sort_by_key(|m| m.ended_at);

    let (Some(first), Some(last)) = (period.first(), period.last()) else {
        return PeriodProgress::empty();
    };

    let games = period.len();
    let elo_change = span_change(first, last);
    let wins = period.iter().filter(|m| m.is_win()).count();
    let ratings: Vec<f64> = period.iter().filter_map(|m| m.rating_after()).collect();

    let total_days = if games > 1 {
        (last.ended_at - first.ended_at) as f64 / SECONDS_PER_DAY as f64
    } else {
        1.0
    };
    let day_divisor = total_days.max(1.0);

    PeriodProgress {
        games,
        elo_change: elo_change.round() as i64,
        win_rate: round_to(calculate_win_rate(wins, games), 1),
        avg_elo: mean(&ratings).map(|avg| avg.round() as i64),
        start_elo: first.rating_before(),
        end_elo: last.rating_after(),
        games_per_day: Some(round_to(games as f64 / day_divisor, 2)),
        elo_per_game: Some(round_to(elo_change / games as f64, 2)),
        elo_per_day: Some(round_to(elo_change / day_divisor, 2)),
        total_days: Some(round_to(total_days, 2)),
    }
}

/// Rating change from the start of `first` to the end of `last`, or 0 when
/// either side is unknown.
fn span_change(first: &MatchRecord, last: &MatchRecord) -> f64 {
    match (first.rating_before(), last.rating_after()) {
        (Some(before), Some(after)) => after - before,
        _ => 0.0,
    }
}

/// Does playing more per week go together with gaining more rating?
///
/// Matches are bucketed into fixed 7-day windows aligned to the epoch, and the
/// Pearson coefficient is taken between weekly game counts and weekly rating
/// change.
pub fn calculate_volume_progress_correlation(matches: &[MatchRecord]) -> VolumeProgressCorrelation {
    if matches.len() < MIN_CORRELATION_MATCHES {
        return unanswered(
            CorrelationStatus::InsufficientData,
            "Insufficient data for correlation analysis",
            "Play more games to generate enough data",
        );
    }

    let weekly = weekly_stats(matches);
    if weekly.len() < MIN_CORRELATION_WEEKS {
        return unanswered(
            CorrelationStatus::InsufficientPeriods,
            "Too few periods for meaningful analysis",
            "Keep playing for a few more weeks",
        );
    }

    let volumes: Vec<f64> = weekly.iter().map(|w| w.games as f64).collect();
    let progress: Vec<f64> = weekly.iter().map(|w| w.elo_change).collect();
    let r = pearson_correlation(&volumes, &progress);
    let band = CorrelationBand::from_coefficient(r);

    VolumeProgressCorrelation {
        status: CorrelationStatus::Analyzed,
        correlation_coefficient: Some(round_to(r, 3)),
        band: Some(band),
        analysis: band.analysis().to_string(),
        recommendation: band.recommendation().to_string(),
        efficiency_brackets: efficiency_brackets(&weekly),
        total_weeks_analyzed: Some(weekly.len()),
    }
}

fn unanswered(
    status: CorrelationStatus,
    analysis: &str,
    recommendation: &str,
) -> VolumeProgressCorrelation {
    VolumeProgressCorrelation {
        status,
        correlation_coefficient: None,
        band: None,
        analysis: analysis.to_string(),
        recommendation: recommendation.to_string(),
        efficiency_brackets: Vec::new(),
        total_weeks_analyzed: None,
    }
}

fn weekly_stats(matches: &[MatchRecord]) -> Vec<WeeklyStat> {
    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by_key(|m| m.ended_at);

    let mut weeks: BTreeMap<i64, Vec<&MatchRecord>> = BTreeMap::new();
    for m in sorted {
        let week_start = m.ended_at.div_euclid(SECONDS_PER_WEEK) * SECONDS_PER_WEEK;
        weeks.entry(week_start).or_default().push(m);
    }

    weeks
        .into_iter()
        .filter_map(|(week_start, week)| {
            let first = week.first()?;
            let last = week.last()?;
            let games = week.len();
            let elo_change = span_change(first, last);
            let wins = week.iter().filter(|m| m.is_win()).count();

            Some(WeeklyStat {
                week_start,
                games,
                elo_change,
                win_rate: round_to(calculate_win_rate(wins, games), 1),
                efficiency: elo_change / games as f64,
            })
        })
        .collect()
}

fn efficiency_brackets(weekly: &[WeeklyStat]) -> Vec<EfficiencyBracket> {
    VOLUME_BRACKETS
        .iter()
        .map(|&(min, max, label)| {
            let weeks: Vec<&WeeklyStat> = weekly
                .iter()
                .filter(|w| w.games >= min && w.games <= max)
                .collect();

            let average = |f: fn(&WeeklyStat) -> f64| {
                let values: Vec<f64> = weeks.iter().map(|w| f(*w)).collect();
                mean(&values).unwrap_or(0.0)
            };

            EfficiencyBracket {
                bracket: label.to_string(),
                avg_games: round_to(average(|w| w.games as f64), 1),
                avg_efficiency: round_to(average(|w| w.efficiency), 2),
                avg_win_rate: round_to(average(|w| w.win_rate), 1),
                sample_size: weeks.len(),
            }
        })
        .collect()
}

/// Pearson correlation coefficient of two equally long series.
///
/// Returns 0 for empty or mismatched series and when either series has no
/// variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || denominator.is_nan() {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DAY: i64 = SECONDS_PER_DAY;
    /// A Thursday 00:00 UTC that is also a bucket boundary.
    const WEEK0: i64 = 2800 * SECONDS_PER_WEEK;

    fn game(id: &str, t: i64, won: bool, before: f64, after: f64) -> MatchRecord {
        MatchRecord::new(id, 1, t)
            .with_result(won)
            .with_ratings(before, after)
    }

    /// `games_per_week[k]` wins of +10 each in week k.
    fn weekly_wins(games_per_week: &[usize]) -> Vec<MatchRecord> {
        let mut rating = 1500.0;
        let mut matches = Vec::new();
        for (week, &games) in games_per_week.iter().enumerate() {
            for g in 0..games {
                let t = WEEK0 + week as i64 * SECONDS_PER_WEEK + g as i64 * 3600;
                matches.push(game(&format!("w{}g{}", week, g), t, true, rating, rating + 10.0));
                rating += 10.0;
            }
        }
        matches
    }

    #[test]
    fn test_period_progress_empty_window() {
        let matches = vec![game("a", 1000, true, 1500.0, 1510.0)];
        let progress = calculate_period_progress(&matches, Some(2000), Some(3000));

        assert_eq!(progress.games, 0);
        assert_eq!(progress.elo_change, 0);
        assert_eq!(progress.win_rate, 0.0);
        assert_eq!(progress.avg_elo, None);
        assert_eq!(progress.start_elo, None);
        assert_eq!(progress.end_elo, None);
        assert_eq!(progress, PeriodProgress::empty());
    }

    #[test]
    fn test_period_progress_whole_history() {
        let matches = vec![
            game("a", WEEK0, true, 1500.0, 1515.0),
            game("b", WEEK0 + DAY, false, 1515.0, 1500.0),
            game("c", WEEK0 + 2 * DAY, true, 1500.0, 1516.0),
            game("d", WEEK0 + 4 * DAY, true, 1516.0, 1530.0),
        ];

        let progress = calculate_period_progress(&matches, None, None);

        assert_eq!(
            progress,
            PeriodProgress {
                games: 4,
                elo_change: 30,
                win_rate: 75.0,
                avg_elo: Some(1515),
                start_elo: Some(1500.0),
                end_elo: Some(1530.0),
                games_per_day: Some(1.0),
                elo_per_game: Some(7.5),
                elo_per_day: Some(7.5),
                total_days: Some(4.0),
            }
        );
    }

    #[test]
    fn test_period_progress_bounds_are_inclusive() {
        let matches = vec![
            game("a", 100, true, 1500.0, 1510.0),
            game("b", 200, false, 1510.0, 1495.0),
            game("c", 300, true, 1495.0, 1505.0),
        ];

        let progress = calculate_period_progress(&matches, Some(200), Some(300));
        assert_eq!(progress.games, 2);
        assert_eq!(progress.start_elo, Some(1510.0));
        assert_eq!(progress.elo_change, -5);
        assert_eq!(progress.win_rate, 50.0);
    }

    #[test]
    fn test_period_progress_single_match_counts_one_day() {
        let matches = vec![game("a", 100, true, 1500.0, 1512.0)];
        let progress = calculate_period_progress(&matches, None, None);

        assert_eq!(progress.total_days, Some(1.0));
        assert_eq!(progress.games_per_day, Some(1.0));
        assert_eq!(progress.elo_per_day, Some(12.0));
    }

    #[test]
    fn test_period_progress_short_span_uses_one_day_floor() {
        let matches = vec![
            game("a", 0, true, 1500.0, 1510.0),
            game("b", DAY / 2, true, 1510.0, 1520.0),
        ];
        let progress = calculate_period_progress(&matches, None, None);

        assert_eq!(progress.total_days, Some(0.5));
        assert_eq!(progress.games_per_day, Some(2.0));
        assert_eq!(progress.elo_per_day, Some(20.0));
    }

    #[test]
    fn test_period_progress_win_rate_one_decimal() {
        let matches = vec![
            game("a", 1, true, 1500.0, 1510.0),
            game("b", 2, false, 1510.0, 1500.0),
            game("c", 3, false, 1500.0, 1490.0),
        ];
        let progress = calculate_period_progress(&matches, None, None);
        assert_eq!(progress.win_rate, 33.3);
    }

    #[test]
    fn test_period_progress_missing_ratings() {
        let matches = vec![
            MatchRecord::new("a", 1, 1).with_result(true),
            MatchRecord::new("b", 1, 2).with_result(true),
        ];
        let progress = calculate_period_progress(&matches, None, None);

        assert_eq!(progress.games, 2);
        assert_eq!(progress.elo_change, 0);
        assert_eq!(progress.avg_elo, None);
        assert_eq!(progress.win_rate, 100.0);
    }

    #[test]
    fn test_pearson_perfect_positive() {
        assert_eq!(pearson_correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson_correlation(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]);
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert_eq!(pearson_correlation(&[], &[]), 0.0);
        assert_eq!(pearson_correlation(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(pearson_correlation(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_correlation_needs_ten_matches() {
        let result = calculate_volume_progress_correlation(&weekly_wins(&[3, 3, 3]));

        assert_eq!(result.status, CorrelationStatus::InsufficientData);
        assert_eq!(result.correlation_coefficient, None);
        assert!(result.efficiency_brackets.is_empty());
    }

    #[test]
    fn test_correlation_two_weeks_is_too_few_periods() {
        let result = calculate_volume_progress_correlation(&weekly_wins(&[6, 9]));

        assert_eq!(result.status, CorrelationStatus::InsufficientPeriods);
        assert_eq!(result.correlation_coefficient, None);
        assert!(result.analysis.contains("few periods"));
        assert!(result.efficiency_brackets.is_empty());
        assert_eq!(result.total_weeks_analyzed, None);
    }

    #[test]
    fn test_correlation_strong_positive() {
        let result = calculate_volume_progress_correlation(&weekly_wins(&[2, 4, 6]));

        assert_eq!(result.status, CorrelationStatus::Analyzed);
        assert_eq!(result.correlation_coefficient, Some(1.0));
        assert_eq!(result.band, Some(CorrelationBand::StrongPositive));
        assert_eq!(result.analysis, CorrelationBand::StrongPositive.analysis());
        assert_eq!(result.total_weeks_analyzed, Some(3));
    }

    #[test]
    fn test_correlation_brackets() {
        let result = calculate_volume_progress_correlation(&weekly_wins(&[2, 4, 6]));
        let brackets = &result.efficiency_brackets;

        assert_eq!(brackets.len(), 4);
        assert_eq!(
            brackets[0],
            EfficiencyBracket {
                bracket: "Light (0-5/week)".to_string(),
                avg_games: 3.0,
                avg_efficiency: 10.0,
                avg_win_rate: 100.0,
                sample_size: 2,
            }
        );
        assert_eq!(brackets[1].sample_size, 1);
        assert_eq!(brackets[1].avg_games, 6.0);

        // Empty brackets report zeros, not nulls.
        assert_eq!(brackets[3].sample_size, 0);
        assert_eq!(brackets[3].avg_games, 0.0);
        assert_eq!(brackets[3].avg_efficiency, 0.0);
    }

    #[test]
    fn test_correlation_negative_when_busy_weeks_lose() {
        // Busy weeks lose rating, quiet weeks gain it.
        let mut matches = Vec::new();
        let mut rating = 1600.0;
        for (week, games) in [2usize, 12, 3, 14].iter().enumerate() {
            let delta = if *games > 5 { -10.0 } else { 10.0 };
            for g in 0..*games {
                let t = WEEK0 + week as i64 * SECONDS_PER_WEEK + g as i64 * 3600;
                matches.push(game(
                    &format!("{}-{}", week, g),
                    t,
                    delta > 0.0,
                    rating,
                    rating + delta,
                ));
                rating += delta;
            }
        }

        let result = calculate_volume_progress_correlation(&matches);
        assert_eq!(result.status, CorrelationStatus::Analyzed);
        assert_eq!(result.band, Some(CorrelationBand::StrongNegative));
        assert!(result.correlation_coefficient.unwrap() < -0.5);
    }
}
