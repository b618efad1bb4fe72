//! Tilt detection: losing streaks and sharp rating drops.

use std::borrow::Borrow;

use crate::models::{MatchRecord, TiltEvent, TiltKind};

/// Minimum consecutive losses reported as a streak.
const MIN_STREAK: usize = 3;

/// Rating loss that counts as a drop.
const DROP_THRESHOLD: f64 = 40.0;

/// Matches scanned after the starting match when looking for a drop.
const DROP_LOOKAHEAD: usize = 9;

/// Detect tilt episodes in a chronologically sorted history.
///
/// Loss streaks are reported first, then rating drops. The two passes are
/// independent and may report overlapping spans. Drops starting at different
/// matches are not merged either, so one slump can produce several `elo_drop`
/// events.
pub fn detect_tilt_streaks<M: Borrow<MatchRecord>>(matches: &[M]) -> Vec<TiltEvent> {
    let mut tilts = loss_streaks(matches);
    tilts.extend(elo_drops(matches));
    tilts
}

fn record<M: Borrow<MatchRecord>>(m: &M) -> &MatchRecord {
    m.borrow()
}

fn loss_streaks<M: Borrow<MatchRecord>>(matches: &[M]) -> Vec<TiltEvent> {
    let mut tilts = Vec::new();
    let mut streak: Vec<&MatchRecord> = Vec::new();

    for m in matches {
        let m = record(m);
        if m.is_loss() {
            streak.push(m);
            continue;
        }
        if let Some(event) = streak_event(&streak) {
            tilts.push(event);
        }
        streak.clear();
    }

    if let Some(event) = streak_event(&streak) {
        tilts.push(event);
    }

    tilts
}

fn streak_event(streak: &[&MatchRecord]) -> Option<TiltEvent> {
    if streak.len() < MIN_STREAK {
        return None;
    }

    let first = streak.first()?;
    let last = streak.last()?;
    let elo_drop = match (first.rating_before(), last.rating_after()) {
        (Some(before), Some(after)) => (before - after).round() as i64,
        _ => 0,
    };

    Some(TiltEvent {
        kind: TiltKind::LossStreak,
        from_match: first.match_id.clone(),
        to_match: last.match_id.clone(),
        losses: streak.len(),
        elo_drop,
    })
}

fn elo_drops<M: Borrow<MatchRecord>>(matches: &[M]) -> Vec<TiltEvent> {
    let mut tilts = Vec::new();

    for i in 0..matches.len() {
        let start = record(&matches[i]);
        let Some(start_rating) = start.rating_after() else {
            continue;
        };

        let end = (i + DROP_LOOKAHEAD).min(matches.len() - 1);
        for j in (i + 1)..=end {
            let candidate = record(&matches[j]);
            let Some(rating) = candidate.rating_after() else {
                continue;
            };

            let drop = start_rating - rating;
            if drop >= DROP_THRESHOLD {
                let losses = matches[i..=j]
                    .iter()
                    .filter(|m| record(*m).is_loss())
                    .count();
                tilts.push(TiltEvent {
                    kind: TiltKind::EloDrop,
                    from_match: start.match_id.clone(),
                    to_match: candidate.match_id.clone(),
                    losses,
                    elo_drop: drop.round() as i64,
                });
                break;
            }
        }
    }

    tilts
}
