//! Core data models for the ladder tracker.

mod account;
mod ids;
mod match_record;
mod progress;
mod stats;

pub use account::*;
pub use ids::*;
pub use match_record::*;
pub use progress::*;
pub use stats::*;
