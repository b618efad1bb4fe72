//! Normalized match records.

use serde::{Deserialize, Serialize};

use super::{MatchId, ProfileId};

/// Ladder tag for 1v1 random-map matches.
pub const LADDER_RM_1V1: &str = "rm_1v1";

/// One finished (or in-flight) match from the perspective of one tracked player.
///
/// Records are produced by an external collector and are read-only here.
/// Ratings and results are optional because upstream sources do not always
/// report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,

    pub profile_id: ProfileId,

    /// Start time, epoch seconds
    #[serde(default)]
    pub started_at: i64,

    /// Completion time, epoch seconds. Zero or negative means unfinished.
    #[serde(default)]
    pub ended_at: i64,

    #[serde(default = "default_ladder")]
    pub ladder: String,

    #[serde(default)]
    pub map: String,

    #[serde(default)]
    pub civ: Option<String>,

    #[serde(default)]
    pub won: Option<bool>,

    #[serde(default)]
    pub rating_before: Option<f64>,

    #[serde(default)]
    pub rating_after: Option<f64>,
}

fn default_ladder() -> String {
    LADDER_RM_1V1.to_string()
}

impl MatchRecord {
    /// Create a finished 1v1 record with no result or ratings attached.
    pub fn new(match_id: impl Into<MatchId>, profile_id: ProfileId, ended_at: i64) -> Self {
        Self {
            match_id: match_id.into(),
            profile_id,
            started_at: ended_at,
            ended_at,
            ladder: default_ladder(),
            map: String::new(),
            civ: None,
            won: None,
            rating_before: None,
            rating_after: None,
        }
    }

    /// Set the match result.
    pub fn with_result(mut self, won: bool) -> Self {
        self.won = Some(won);
        self
    }

    /// Set the rating before and after the match.
    pub fn with_ratings(mut self, before: f64, after: f64) -> Self {
        self.rating_before = Some(before);
        self.rating_after = Some(after);
        self
    }

    /// Set only the post-match rating.
    pub fn with_rating_after(mut self, after: f64) -> Self {
        self.rating_after = Some(after);
        self
    }

    pub fn with_ladder(mut self, ladder: &str) -> Self {
        self.ladder = ladder.to_string();
        self
    }

    /// Whether the match has a completion time.
    pub fn is_finished(&self) -> bool {
        self.ended_at > 0
    }

    /// A known loss. Unknown results are not losses.
    pub fn is_loss(&self) -> bool {
        self.won == Some(false)
    }

    pub fn is_win(&self) -> bool {
        self.won == Some(true)
    }

    /// Post-match rating, if present and finite.
    pub fn rating_after(&self) -> Option<f64> {
        self.rating_after.filter(|r| r.is_finite())
    }

    /// Pre-match rating, if present and finite.
    pub fn rating_before(&self) -> Option<f64> {
        self.rating_before.filter(|r| r.is_finite())
    }

    /// Rating gained or lost in this match, when both sides are known.
    pub fn rating_change(&self) -> Option<f64> {
        Some(self.rating_after()? - self.rating_before()?)
    }
}

/// Stable ascending sort by completion time. Ties keep input order.
pub fn sort_by_ended_at(matches: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by_key(|m| m.ended_at);
    sorted
}
