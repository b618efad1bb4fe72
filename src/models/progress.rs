//! Progress, correlation, and play-pattern report models.

use serde::{Deserialize, Serialize};

use super::{MatchRecord, ProfileId, StatsBundle};

/// Rating progress over a time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodProgress {
    pub games: usize,
    pub elo_change: i64,
    /// Percentage, one decimal
    pub win_rate: f64,
    pub avg_elo: Option<i64>,
    pub start_elo: Option<f64>,
    pub end_elo: Option<f64>,
    pub games_per_day: Option<f64>,
    pub elo_per_game: Option<f64>,
    pub elo_per_day: Option<f64>,
    pub total_days: Option<f64>,
}

impl PeriodProgress {
    /// Progress for a window with no matches.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Aggregate of one 7-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStat {
    /// Bucket start, epoch seconds
    pub week_start: i64,
    pub games: usize,
    pub elo_change: f64,
    pub win_rate: f64,
    /// Elo gained per game
    pub efficiency: f64,
}

/// Averages over the weeks whose volume falls in one bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyBracket {
    pub bracket: String,
    pub avg_games: f64,
    pub avg_efficiency: f64,
    pub avg_win_rate: f64,
    pub sample_size: usize,
}

/// Whether a correlation could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStatus {
    /// Fewer than 10 matches
    InsufficientData,
    /// Fewer than 3 weekly buckets
    InsufficientPeriods,
    Analyzed,
}

/// Qualitative reading of a volume/progress correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationBand {
    StrongPositive,
    ModeratePositive,
    Neutral,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationBand {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.5 {
            CorrelationBand::StrongPositive
        } else if r > 0.2 {
            CorrelationBand::ModeratePositive
        } else if r > -0.2 {
            CorrelationBand::Neutral
        } else if r > -0.5 {
            CorrelationBand::ModerateNegative
        } else {
            CorrelationBand::StrongNegative
        }
    }

    pub fn analysis(&self) -> &'static str {
        match self {
            CorrelationBand::StrongPositive => {
                "Strong positive correlation: the more you play, the more you progress"
            }
            CorrelationBand::ModeratePositive => {
                "Moderate positive correlation: playing more tends to help your progress"
            }
            CorrelationBand::Neutral => {
                "Neutral correlation: volume does not significantly affect your progress"
            }
            CorrelationBand::ModerateNegative => {
                "Moderate negative correlation: playing too much may hurt your progress"
            }
            CorrelationBand::StrongNegative => {
                "Strong negative correlation: excessive volume hurts your progress"
            }
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            CorrelationBand::StrongPositive => "Keep up your current volume of games!",
            CorrelationBand::ModeratePositive => {
                "Consider slightly increasing your volume of games"
            }
            CorrelationBand::Neutral => "Focus on the quality of your games rather than volume",
            CorrelationBand::ModerateNegative => {
                "Consider reducing volume and focusing on higher quality games"
            }
            CorrelationBand::StrongNegative => {
                "Significantly reduce your volume of games and improve their quality"
            }
        }
    }
}

/// Volume-vs-progress correlation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProgressCorrelation {
    pub status: CorrelationStatus,
    pub correlation_coefficient: Option<f64>,
    pub band: Option<CorrelationBand>,
    pub analysis: String,
    pub recommendation: String,
    pub efficiency_brackets: Vec<EfficiencyBracket>,
    pub total_weeks_analyzed: Option<usize>,
}

/// Games, win rate, and average rating change for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPattern {
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u32,
    pub name: String,
    pub games: usize,
    /// Integer percentage
    pub win_rate: i64,
    pub avg_elo_change: f64,
}

/// Games, win rate, and average rating change for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourPattern {
    pub hour: u32,
    pub games: usize,
    pub win_rate: i64,
    pub avg_elo_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Pattern,
    Positive,
    Info,
    Performance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// When a player plays and how it goes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub weekday_distribution: Vec<DayPattern>,
    pub hour_distribution: Vec<HourPattern>,
    pub peak_day: Option<String>,
    pub peak_hour: Option<u32>,
    pub consistency_score: i64,
    pub insights: Vec<Insight>,
}

/// Output ordering for history listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("sort must be \"asc\" or \"desc\", got \"{}\"", other)),
        }
    }
}

/// Selection parameters for a player history report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub limit: Option<usize>,
    pub sort: SortOrder,
}

/// Progress over the standard reporting windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressWindows {
    pub last_week: PeriodProgress,
    pub last_month: PeriodProgress,
    pub last_quarter: PeriodProgress,
    pub overall: PeriodProgress,
}

/// Full history report for a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHistory {
    pub profile_id: ProfileId,
    pub nick: Option<String>,
    pub total_matches: usize,
    pub matches: Vec<MatchRecord>,
    pub stats: StatsBundle,
    pub progress: ProgressWindows,
    pub volume_progress_correlation: VolumeProgressCorrelation,
    pub game_patterns: PatternReport,
    pub period: HistoryQuery,
}
