//! Per-account match files and the roster file.

use std::collections::HashSet;
use std::fs;

use tracing::{debug, info, warn};

use crate::models::{MatchId, MatchRecord, ProfileId, TrackedAccount};
use crate::roster::Roster;

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// Read/write access to the tracker's data directory.
#[derive(Debug, Clone)]
pub struct MatchStore {
    config: StorageConfig,
}

impl MatchStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Load the roster. A missing roster file is an error.
    pub fn load_roster(&self) -> Result<Roster, StorageError> {
        let path = self.config.roster_path();
        if !path.exists() {
            return Err(StorageError::PathNotFound(path));
        }

        let accounts: Vec<TrackedAccount> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let total = accounts.len();
        let roster = Roster::from_accounts(accounts);
        debug!(
            "Loaded roster with {} tracked accounts ({} entries) from {:?}",
            roster.len(),
            total,
            path
        );

        Ok(roster)
    }

    pub fn save_roster(&self, accounts: &[TrackedAccount]) -> Result<(), StorageError> {
        let path = self.config.roster_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(accounts)?)?;
        Ok(())
    }

    /// All stored records for one account. No file means no matches.
    pub fn read_matches(&self, profile_id: ProfileId) -> Result<Vec<MatchRecord>, StorageError> {
        JsonlReader::new(self.config.matches_path(profile_id)).read_all()
    }

    /// Stored records of every roster account.
    ///
    /// An account whose file cannot be read is logged and skipped.
    pub fn read_all_matches(&self, roster: &Roster) -> Vec<MatchRecord> {
        let mut all = Vec::new();
        for account in roster.accounts() {
            match self.read_matches(account.id) {
                Ok(matches) => all.extend(matches),
                Err(e) => warn!("Failed to read matches for profile {}: {}", account.id, e),
            }
        }
        all
    }

    /// Merge `records` into the account's file, skipping known match ids.
    ///
    /// Records for other profiles are ignored. The file is rewritten newest
    /// first, and only when something new arrived. Returns how many were added.
    pub fn import(
        &self,
        profile_id: ProfileId,
        records: Vec<MatchRecord>,
    ) -> Result<usize, StorageError> {
        let mut stored = self.read_matches(profile_id)?;
        let mut known: HashSet<MatchId> = stored.iter().map(|m| m.match_id.clone()).collect();

        let mut added = 0;
        for record in records {
            if record.profile_id != profile_id {
                warn!(
                    "Skipping match {} for profile {} while importing {}",
                    record.match_id, record.profile_id, profile_id
                );
                continue;
            }
            if known.insert(record.match_id.clone()) {
                stored.push(record);
                added += 1;
            }
        }

        if added == 0 {
            info!("No new matches for profile {}", profile_id);
            return Ok(0);
        }

        stored.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
        JsonlWriter::new(self.config.matches_path(profile_id)).write_all(&stored)?;
        info!("Saved {} new matches for profile {}", added, profile_id);

        Ok(added)
    }
}
