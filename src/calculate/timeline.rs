//! Elo timeline bucketed by day or week.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{Granularity, MatchRecord, TimelinePoint};

#[derive(Debug)]
struct Bucket {
    sum: f64,
    count: usize,
    last_at: i64,
    last_elo: f64,
}

/// Average and closing rating per time bucket, oldest bucket first.
///
/// Only finished matches with a known `rating_after` contribute.
pub fn compute_timeline(matches: &[MatchRecord], granularity: Granularity) -> Vec<TimelinePoint> {
    let size = granularity.seconds();
    let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();

    for m in matches.iter().filter(|m| m.is_finished()) {
        let Some(rating) = m.rating_after() else {
            continue;
        };
        let start = m.ended_at.div_euclid(size) * size;

        buckets
            .entry(start)
            .and_modify(|b| {
                b.sum += rating;
                b.count += 1;
                if m.ended_at > b.last_at {
                    b.last_at = m.ended_at;
                    b.last_elo = rating;
                }
            })
            .or_insert(Bucket {
                sum: rating,
                count: 1,
                last_at: m.ended_at,
                last_elo: rating,
            });
    }

    buckets
        .into_iter()
        .filter_map(|(start, b)| {
            let date = DateTime::<Utc>::from_timestamp(start, 0)?;
            Some(TimelinePoint {
                bucket: date.format("%Y-%m-%d").to_string(),
                avg_elo: (b.sum / b.count as f64).round() as i64,
                last_elo: b.last_elo,
            })
        })
        .collect()
}
