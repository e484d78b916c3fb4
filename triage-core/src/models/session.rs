use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Lifecycle status reported by the server. Values other than `active` and
/// `closed` are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    Active,
    Closed,
    Other(String),
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Closed => "closed",
            SessionStatus::Other(s) => s,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionStatus::Closed)
    }
}

impl From<String> for SessionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => SessionStatus::Active,
            "closed" => SessionStatus::Closed,
            _ => SessionStatus::Other(s),
        }
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One customer conversation as returned by `GET /admin/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub last_message: String,
    /// Opaque customer metadata, never inspected.
    #[serde(default)]
    pub user_meta: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<String>,
    #[serde(default)]
    pub updated_at: String,
}

impl Session {
    /// The assigned handler, with an empty string treated as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_agent.as_deref().filter(|a| !a.is_empty())
    }

    /// Addressable reference for the session detail view.
    pub fn detail_path(&self) -> String {
        format!("/sessions/{}", self.session_id)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("session at index {index} is malformed: {reason}")]
pub struct ShapeError {
    pub index: usize,
    pub reason: String,
}

/// Success body of the sessions endpoint. The server has shipped both an
/// `items` and a `sessions` key over time; `items` wins when both appear.
#[derive(Debug, Default, Deserialize)]
pub struct SessionEnvelope {
    #[serde(default)]
    pub items: Option<Vec<Session>>,
    #[serde(default)]
    pub sessions: Option<Vec<Session>>,
}

impl SessionEnvelope {
    /// Unwrap the list and enforce the session shape: every `sessionId` is
    /// non-blank and unique. Later duplicates are dropped.
    pub fn into_sessions(self) -> Result<Vec<Session>, ShapeError> {
        let raw = self.items.or(self.sessions).unwrap_or_default();
        let mut seen = HashSet::with_capacity(raw.len());
        let mut out = Vec::with_capacity(raw.len());

        for (index, session) in raw.into_iter().enumerate() {
            if session.session_id.trim().is_empty() {
                return Err(ShapeError {
                    index,
                    reason: "sessionId is blank".to_string(),
                });
            }
            if !seen.insert(session.session_id.clone()) {
                tracing::warn!(
                    index,
                    session_id = %session.session_id,
                    "Dropping duplicate session in response"
                );
                continue;
            }
            out.push(session);
        }

        Ok(out)
    }
}
