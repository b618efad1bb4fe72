//! Tracked-account roster and match selection.
//!
//! The roster decides whose matches count. Records from profiles that are not
//! on the roster never reach the statistics engine.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{MatchRecord, ProfileId, StatsBundle, TrackedAccount, LADDER_RM_1V1};

/// The set of community accounts being tracked, in roster-file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    accounts: Vec<TrackedAccount>,
}

/// One tracked account together with its selected matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountMatches {
    pub account: TrackedAccount,
    pub matches: Vec<MatchRecord>,
}

impl Roster {
    /// Build a roster, dropping entries without a steam id and repeated ids.
    pub fn from_accounts(accounts: impl IntoIterator<Item = TrackedAccount>) -> Self {
        let mut seen = HashSet::new();
        let accounts = accounts
            .into_iter()
            .filter(|a| !a.steam.trim().is_empty())
            .filter(|a| seen.insert(a.id))
            .collect();

        Self { accounts }
    }

    pub fn accounts(&self) -> &[TrackedAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        self.accounts.iter().any(|a| a.id == id)
    }

    pub fn get(&self, id: ProfileId) -> Option<&TrackedAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn nick_for(&self, id: ProfileId) -> Option<&str> {
        self.get(id).and_then(|a| a.nick.as_deref())
    }

    /// Split matches by owner. Every tracked account gets an entry, in roster
    /// order, even with no matches; untracked profiles are dropped.
    pub fn group_by_account(&self, matches: Vec<MatchRecord>) -> Vec<AccountMatches> {
        let mut by_id: BTreeMap<ProfileId, Vec<MatchRecord>> = BTreeMap::new();
        for m in matches {
            if self.contains(m.profile_id) {
                by_id.entry(m.profile_id).or_default().push(m);
            }
        }

        self.accounts
            .iter()
            .map(|account| AccountMatches {
                account: account.clone(),
                matches: by_id.remove(&account.id).unwrap_or_default(),
            })
            .collect()
    }
}

/// Convert grouped matches into the map shape consolidation expects.
pub fn matches_by_profile(groups: &[AccountMatches]) -> BTreeMap<ProfileId, Vec<MatchRecord>> {
    groups
        .iter()
        .map(|g| (g.account.id, g.matches.clone()))
        .collect()
}

/// A per-account slice of a stats report, labelled for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport<'a, T> {
    pub profile_id: ProfileId,
    pub nick: &'a str,
    #[serde(flatten)]
    pub report: T,
}

/// Pick one report per grouped account, keeping roster order.
///
/// Accounts missing from `by_account` get `T::default()`.
pub fn account_reports<'a, T, F>(
    groups: &'a [AccountMatches],
    by_account: &BTreeMap<ProfileId, StatsBundle>,
    pick: F,
) -> Vec<AccountReport<'a, T>>
where
    T: Default,
    F: Fn(&StatsBundle) -> T,
{
    groups
        .iter()
        .map(|g| AccountReport {
            profile_id: g.account.id,
            nick: g.account.display_name(),
            report: by_account.get(&g.account.id).map(&pick).unwrap_or_default(),
        })
        .collect()
}

/// Ladder and time-window selection over match records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFilter {
    pub ladder: String,
    /// Inclusive lower bound on `ended_at`
    pub from: Option<i64>,
    /// Inclusive upper bound on `ended_at`
    pub to: Option<i64>,
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self::for_ladder(LADDER_RM_1V1)
    }
}

impl MatchFilter {
    pub fn for_ladder(ladder: &str) -> Self {
        Self {
            ladder: ladder.to_string(),
            from: None,
            to: None,
        }
    }

    pub fn with_window(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn matches(&self, record: &MatchRecord) -> bool {
        record.ladder == self.ladder
            && self.from.map_or(true, |from| record.ended_at >= from)
            && self.to.map_or(true, |to| record.ended_at <= to)
    }

    /// Keep the selected records, newest first.
    pub fn apply(&self, records: Vec<MatchRecord>) -> Vec<MatchRecord> {
        let mut selected: Vec<MatchRecord> =
            records.into_iter().filter(|m| self.matches(m)).collect();
        selected.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
        selected
    }
}
