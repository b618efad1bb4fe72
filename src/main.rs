use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ladder_tracker::calculate::{
    build_player_history, compute_consolidated_stats_at, compute_cycles, compute_timeline,
};
use ladder_tracker::config::AppConfig;
use ladder_tracker::models::{Granularity, HistoryQuery, MatchRecord, ProfileId, SortOrder};
use ladder_tracker::roster::{account_reports, matches_by_profile, AccountMatches, MatchFilter};
use ladder_tracker::storage::{MatchStore, StorageConfig};

#[derive(Parser)]
#[command(name = "ladder-tracker")]
#[command(about = "Community ladder tracker with Elo progress statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-account and consolidated statistics
    Summary {
        #[arg(long)]
        ladder: Option<String>,

        /// Only matches ending at or after this epoch second
        #[arg(long)]
        from: Option<i64>,

        /// Only matches ending at or before this epoch second
        #[arg(long)]
        to: Option<i64>,
    },

    /// Games played in the last week and month
    Volume {
        #[arg(long)]
        ladder: Option<String>,

        #[arg(long)]
        from: Option<i64>,

        #[arg(long)]
        to: Option<i64>,
    },

    /// Time taken to climb between rating thresholds, roster-wide
    Cycles {
        #[arg(long)]
        ladder: Option<String>,
    },

    /// Roster-wide Elo timeline
    Timeline {
        /// Bucket width: day or week
        #[arg(long)]
        granularity: Option<Granularity>,

        /// How many days back to include
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,

        #[arg(long)]
        ladder: Option<String>,
    },

    /// Full history report for one player
    History {
        #[arg(long)]
        profile: ProfileId,

        #[arg(long)]
        from: Option<i64>,

        #[arg(long)]
        to: Option<i64>,

        /// Keep only the most recent N matches
        #[arg(long)]
        limit: Option<usize>,

        /// Match order: asc or desc
        #[arg(long, default_value = "desc")]
        sort: SortOrder,
    },

    /// Merge a JSON array of match records into an account's history
    Import {
        #[arg(long)]
        profile: ProfileId,

        /// JSON file holding an array of match records
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    info!("Starting ladder-tracker v{}", env!("CARGO_PKG_VERSION"));

    let store = MatchStore::new(StorageConfig::new(config.data_dir.clone()));
    let ladder_or_default =
        |ladder: Option<String>| ladder.unwrap_or_else(|| config.tracker.default_ladder.clone());
    let now = Utc::now().timestamp();

    match cli.command {
        Commands::Summary { ladder, from, to } => {
            let filter = MatchFilter::for_ladder(&ladder_or_default(ladder)).with_window(from, to);
            let groups = load_groups(&store, &filter)?;
            let consolidated = compute_consolidated_stats_at(&matches_by_profile(&groups), now);

            let accounts = account_reports(&groups, &consolidated.by_account, |s| s.clone());

            print_json(&json!({
                "ladder": filter.ladder,
                "accounts": accounts,
                "consolidated": consolidated.consolidated,
            }))?;
        }

        Commands::Volume { ladder, from, to } => {
            let filter = MatchFilter::for_ladder(&ladder_or_default(ladder)).with_window(from, to);
            let groups = load_groups(&store, &filter)?;
            let consolidated = compute_consolidated_stats_at(&matches_by_profile(&groups), now);

            let accounts = account_reports(&groups, &consolidated.by_account, |s| s.volume);

            print_json(&json!({
                "ladder": filter.ladder,
                "accounts": accounts,
                "consolidated": consolidated.consolidated.volume,
            }))?;
        }

        Commands::Cycles { ladder } => {
            let filter = MatchFilter::for_ladder(&ladder_or_default(ladder));
            let groups = load_groups(&store, &filter)?;
            let all: Vec<MatchRecord> = groups.into_iter().flat_map(|g| g.matches).collect();

            print_json(&json!({
                "ladder": filter.ladder,
                "cycles": compute_cycles(&all),
            }))?;
        }

        Commands::Timeline {
            granularity,
            days,
            ladder,
        } => {
            let granularity = granularity.unwrap_or(config.tracker.timeline_granularity);
            let days = days.unwrap_or(config.tracker.timeline_days);
            let since = now - i64::from(days) * Granularity::Day.seconds();

            let filter =
                MatchFilter::for_ladder(&ladder_or_default(ladder)).with_window(Some(since), None);
            let groups = load_groups(&store, &filter)?;
            let all: Vec<MatchRecord> = groups.into_iter().flat_map(|g| g.matches).collect();

            print_json(&json!({
                "ladder": filter.ladder,
                "granularity": granularity,
                "days": days,
                "points": compute_timeline(&all, granularity),
            }))?;
        }

        Commands::History {
            profile,
            from,
            to,
            limit,
            sort,
        } => {
            let roster = store.load_roster().context("Failed to load roster")?;
            let filter = MatchFilter::for_ladder(&config.tracker.default_ladder);
            let matches = filter.apply(
                store
                    .read_matches(profile)
                    .with_context(|| format!("Failed to read matches for {}", profile))?,
            );

            let query = HistoryQuery {
                from,
                to,
                limit,
                sort,
            };
            let mut history = build_player_history(profile, &matches, &query, now);
            history.nick = roster.nick_for(profile).map(str::to_string);

            print_json(&history)?;
        }

        Commands::Import { profile, file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let records: Vec<MatchRecord> = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse match records in {:?}", file))?;
            let received = records.len();

            let added = store
                .import(profile, records)
                .with_context(|| format!("Failed to import matches for {}", profile))?;

            print_json(&json!({
                "profile_id": profile,
                "received": received,
                "added": added,
            }))?;
        }
    }

    Ok(())
}

/// Load the roster and its selected matches, grouped by account.
fn load_groups(store: &MatchStore, filter: &MatchFilter) -> Result<Vec<AccountMatches>> {
    let roster = store.load_roster().context("Failed to load roster")?;
    let matches = filter.apply(store.read_all_matches(&roster));
    info!(
        "Selected {} matches across {} accounts",
        matches.len(),
        roster.len()
    );

    Ok(roster.group_by_account(matches))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
