//! Derived rating statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{MatchId, ProfileId};
use crate::calculate::{SECONDS_PER_DAY, SECONDS_PER_WEEK};

/// Match counts over recent wall-clock windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Matches ended in the last 7 days
    pub week: usize,
    /// Matches ended in the last 30 days
    pub month: usize,
}

/// Mean post-match rating over the last N matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingAverages {
    pub g10: Option<f64>,
    pub g20: Option<f64>,
    pub g30: Option<f64>,
    pub g50: Option<f64>,
    pub g100: Option<f64>,
}

/// Rating quartiles over the recent tail of the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p25: Option<i64>,
    pub p50: Option<i64>,
    pub p75: Option<i64>,
}

/// Rating change against the match N positions back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deltas {
    pub g10: Option<f64>,
    pub g20: Option<f64>,
    pub g30: Option<f64>,
}

/// Kind of tilt episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiltKind {
    /// Three or more consecutive losses
    LossStreak,
    /// A rating drop of 40+ within ten matches
    EloDrop,
}

impl std::fmt::Display for TiltKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TiltKind::LossStreak => write!(f, "loss_streak"),
            TiltKind::EloDrop => write!(f, "elo_drop"),
        }
    }
}

/// A detected tilt episode spanning `from_match..=to_match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiltEvent {
    #[serde(rename = "type")]
    pub kind: TiltKind,
    pub from_match: MatchId,
    pub to_match: MatchId,
    pub losses: usize,
    pub elo_drop: i64,
}

/// Rating statistics for one match history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBundle {
    pub volume: Volume,
    pub rolling_avg: RollingAverages,
    pub percentiles: Percentiles,
    pub delta: Deltas,
    pub tilt: Vec<TiltEvent>,
}

impl StatsBundle {
    /// The bundle for an empty history.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-account bundles plus one bundle over the combined timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedStats {
    #[serde(rename = "byAccount")]
    pub by_account: BTreeMap<ProfileId, StatsBundle>,
    pub consolidated: StatsBundle,
}

/// Matches and days spent climbing from one rating threshold to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EloCycle {
    pub elo_from: i64,
    pub elo_to: i64,
    pub games_in_cycle: usize,
    pub days_in_cycle: i64,
}

/// Timeline bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
}

impl Granularity {
    /// Bucket width in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Granularity::Day => SECONDS_PER_DAY,
            Granularity::Week => SECONDS_PER_WEEK,
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            other => Err(format!(
                "granularity must be \"day\" or \"week\", got \"{}\"",
                other
            )),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
        }
    }
}

/// One point of the rating timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Bucket start date, `YYYY-MM-DD` (UTC)
    pub bucket: String,
    pub avg_elo: i64,
    pub last_elo: f64,
}
