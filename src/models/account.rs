//! Community roster entries.

use serde::{Deserialize, Serialize};

use super::ProfileId;

/// A ladder account belonging to a community member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAccount {
    /// Ladder profile id
    pub id: ProfileId,

    /// Steam id of the owner
    #[serde(default)]
    pub steam: String,

    /// Display nickname
    #[serde(default)]
    pub nick: Option<String>,
}

impl TrackedAccount {
    pub fn new(id: ProfileId, steam: &str, nick: Option<&str>) -> Self {
        Self {
            id,
            steam: steam.to_string(),
            nick: nick.map(str::to_string),
        }
    }

    /// Display name, falling back to "Unknown".
    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or("Unknown")
    }
}
