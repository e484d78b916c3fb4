//! Client-side reclassification the server does not perform.

use crate::models::{Session, Tab};

/// Naming convention for automated handlers: the lowercased id contains
/// `bot` or `ai`, or is exactly `system`.
pub fn is_bot_agent(agent: &str) -> bool {
    let agent = agent.to_lowercase();
    agent.contains("bot") || agent.contains("ai") || agent == "system"
}

/// Keep the sessions `tab` should display, preserving server order.
///
/// - `Active` drops closed sessions the server still returns for the agent.
/// - `Unassigned` keeps sessions with no assignee or a bot assignee, so
///   automation-handled conversations are available for takeover.
/// - `Resolved` is passed through unchanged.
pub fn classify(tab: Tab, sessions: Vec<Session>) -> Vec<Session> {
    match tab {
        Tab::Active => sessions
            .into_iter()
            .filter(|s| !s.status.is_closed())
            .collect(),
        Tab::Unassigned => sessions
            .into_iter()
            .filter(|s| s.assignee().map_or(true, is_bot_agent))
            .collect(),
        Tab::Resolved => sessions,
    }
}
