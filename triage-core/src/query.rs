//! Server query parameters per inbox tab.

use crate::models::{SessionStatus, Tab};

/// Filter sent to `GET /admin/sessions`. `None` fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuery {
    pub agent_id: Option<String>,
    pub status: Option<SessionStatus>,
}

impl SessionQuery {
    /// Query-string pairs in wire order (`agentId`, then `status`).
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(agent_id) = &self.agent_id {
            pairs.push(("agentId", agent_id.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// Build the server filter for `tab`. Returns `None` when the agent is not
/// known, in which case no request should be issued.
///
/// The server has no notion of "unassigned", so that tab only narrows by
/// status and leaves assignment to the classifier.
pub fn build_query(tab: Tab, agent_id: Option<&str>) -> Option<SessionQuery> {
    let agent_id = agent_id.filter(|a| !a.is_empty())?;

    let query = match tab {
        Tab::Active => SessionQuery {
            agent_id: Some(agent_id.to_string()),
            status: None,
        },
        Tab::Unassigned => SessionQuery {
            agent_id: None,
            status: Some(SessionStatus::Active),
        },
        Tab::Resolved => SessionQuery {
            agent_id: Some(agent_id.to_string()),
            status: Some(SessionStatus::Closed),
        },
    };

    Some(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_filters_by_agent_only() {
        let q = build_query(Tab::Active, Some("u1")).unwrap();
        assert_eq!(q.to_pairs(), vec![("agentId", "u1".to_string())]);
    }

    #[test]
    fn test_unassigned_filters_by_status_only() {
        let q = build_query(Tab::Unassigned, Some("u1")).unwrap();
        assert_eq!(q.agent_id, None);
        assert_eq!(q.to_pairs(), vec![("status", "active".to_string())]);
    }

    #[test]
    fn test_resolved_filters_by_status_and_agent() {
        let q = build_query(Tab::Resolved, Some("u1")).unwrap();
        assert_eq!(
            q.to_pairs(),
            vec![
                ("agentId", "u1".to_string()),
                ("status", "closed".to_string())
            ]
        );
    }

    #[test]
    fn test_missing_identity_builds_nothing() {
        for tab in Tab::ALL {
            assert_eq!(build_query(tab, None), None);
            assert_eq!(build_query(tab, Some("")), None);
        }
    }

    #[test]
    fn test_deterministic() {
        for tab in Tab::ALL {
            assert_eq!(build_query(tab, Some("u7")), build_query(tab, Some("u7")));
        }
    }
}
