//! Play-pattern analysis: when a player plays, and how it goes.

use chrono::{Datelike, Local, TimeZone, Timelike};

use crate::models::{DayPattern, HourPattern, Insight, InsightKind, MatchRecord, PatternReport};

use super::round_to;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Share of all games above which the peak day is called out.
const PEAK_DAY_SHARE: f64 = 0.3;
/// Share of all games above which the peak hour is called out.
const PEAK_HOUR_SHARE: f64 = 0.25;
/// Minimum games on a weekday before it can be the best day.
const BEST_DAY_MIN_GAMES: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    games: usize,
    wins: usize,
    elo_change: f64,
}

impl Tally {
    fn add(&mut self, m: &MatchRecord) {
        self.games += 1;
        if m.is_win() {
            self.wins += 1;
        }
        if let Some(change) = m.rating_change() {
            self.elo_change += change;
        }
    }

    fn win_rate(&self) -> i64 {
        if self.games == 0 {
            0
        } else {
            (self.wins as f64 / self.games as f64 * 100.0).round() as i64
        }
    }

    fn avg_elo_change(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            round_to(self.elo_change / self.games as f64, 2)
        }
    }
}

/// Analyze play patterns using the machine's local timezone.
pub fn analyze_game_patterns(matches: &[MatchRecord]) -> PatternReport {
    analyze_game_patterns_in(matches, &Local)
}

/// Analyze play patterns with weekdays and hours taken in `tz`.
pub fn analyze_game_patterns_in<Tz: TimeZone>(matches: &[MatchRecord], tz: &Tz) -> PatternReport {
    if matches.is_empty() {
        return PatternReport::default();
    }

    let mut days = [Tally::default(); 7];
    let mut hours = [Tally::default(); 24];

    for m in matches.iter().filter(|m| m.is_finished()) {
        let Some(local) = tz.timestamp_opt(m.ended_at, 0).single() else {
            continue;
        };
        days[local.weekday().num_days_from_sunday() as usize].add(m);
        hours[local.hour() as usize].add(m);
    }

    let total = matches.len();
    let peak_day = peak_slot(&days);
    let peak_hour = peak_slot(&hours);
    let consistency = consistency_score(&days, total);

    let mut insights = Vec::new();

    let day_games = days[peak_day].games;
    if day_games as f64 > total as f64 * PEAK_DAY_SHARE {
        insights.push(Insight::new(
            InsightKind::Pattern,
            format!(
                "{} is your main playing day ({} games)",
                WEEKDAYS[peak_day], day_games
            ),
        ));
    }

    if hours[peak_hour].games as f64 > total as f64 * PEAK_HOUR_SHARE {
        insights.push(Insight::new(
            InsightKind::Pattern,
            format!(
                "You mostly play {} ({}:00)",
                time_of_day(peak_hour as u32),
                peak_hour
            ),
        ));
    }

    if consistency > 80.0 {
        insights.push(Insight::new(
            InsightKind::Positive,
            "Excellent consistency across playing days!",
        ));
    } else if consistency < 40.0 {
        insights.push(Insight::new(
            InsightKind::Info,
            "Consider spreading your games more evenly across the week",
        ));
    }

    if let Some(best) = best_day(&days) {
        insights.push(Insight::new(
            InsightKind::Performance,
            format!(
                "{} is your best day ({}% win rate)",
                WEEKDAYS[best],
                days[best].win_rate()
            ),
        ));
    }

    PatternReport {
        weekday_distribution: days
            .iter()
            .enumerate()
            .map(|(i, t)| DayPattern {
                weekday: i as u32,
                name: WEEKDAYS[i].to_string(),
                games: t.games,
                win_rate: t.win_rate(),
                avg_elo_change: t.avg_elo_change(),
            })
            .collect(),
        hour_distribution: hours
            .iter()
            .enumerate()
            .map(|(i, t)| HourPattern {
                hour: i as u32,
                games: t.games,
                win_rate: t.win_rate(),
                avg_elo_change: t.avg_elo_change(),
            })
            .collect(),
        peak_day: Some(WEEKDAYS[peak_day].to_string()),
        peak_hour: Some(peak_hour as u32),
        consistency_score: consistency.round() as i64,
        insights,
    }
}

/// Index of the slot with the most games; the earliest slot wins ties.
fn peak_slot(slots: &[Tally]) -> usize {
    let mut peak = 0;
    for (i, slot) in slots.iter().enumerate() {
        if slot.games > slots[peak].games {
            peak = i;
        }
    }
    peak
}

/// How evenly games spread over the weekdays, 0 to 100.
fn consistency_score(days: &[Tally; 7], total: usize) -> f64 {
    let mean = total as f64 / 7.0;
    let variance = days
        .iter()
        .map(|d| (d.games as f64 - mean).powi(2))
        .sum::<f64>()
        / 7.0;

    (100.0 - variance / mean * 10.0).clamp(0.0, 100.0)
}

fn best_day(days: &[Tally; 7]) -> Option<usize> {
    let ratio = |t: &Tally| t.wins as f64 / t.games as f64;

    let mut best: Option<usize> = None;
    for (i, day) in days.iter().enumerate() {
        if day.games < BEST_DAY_MIN_GAMES {
            continue;
        }
        match best {
            Some(b) if ratio(day) <= ratio(&days[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}

fn time_of_day(hour: u32) -> &'static str {
    match hour {
        6..=11 => "in the morning",
        12..=17 => "in the afternoon",
        18..=21 => "in the evening",
        _ => "late at night",
    }
}
