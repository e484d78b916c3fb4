use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Inbox view filter. Drives both the server query and client-side
/// reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Sessions assigned to the current agent that are still open.
    #[default]
    Active,
    /// Open sessions with no human owner, including bot-handled ones.
    Unassigned,
    /// Closed sessions the current agent handled.
    Resolved,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Active, Tab::Unassigned, Tab::Resolved];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Active => "active",
            Tab::Unassigned => "unassigned",
            Tab::Resolved => "resolved",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tab '{0}' (expected one of: active, unassigned, resolved)")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}
