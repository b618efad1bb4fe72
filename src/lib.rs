//! # Ladder Tracker
//!
//! Elo progress statistics for a community roster of ladder accounts.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, accounts, report types)
//! - **calculate**: Statistics engine (per-account stats, tilt, cycles,
//!   progress, correlation, play patterns, timelines, player history)
//! - **roster**: Tracked-account roster and match selection
//! - **storage**: JSONL data directory (roster file, per-account match files)
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod roster;
pub mod storage;

pub use models::*;
