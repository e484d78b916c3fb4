//! Auth collaborator consumed by the inbox.

use std::sync::RwLock;

use crate::config::AuthConfig;

/// The signed-in agent and the bearer token that authenticates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub agent_id: String,
    pub token: String,
}

/// Supplies the current agent identity and the ability to end the login.
pub trait AuthContext: Send + Sync {
    /// `None` when nobody is signed in.
    fn identity(&self) -> Option<AgentIdentity>;

    /// Invoked when the server rejects the token (HTTP 401).
    fn sign_out(&self);
}

/// In-memory auth context. Sign-out forgets the identity.
#[derive(Debug, Default)]
pub struct StaticAuth {
    identity: RwLock<Option<AgentIdentity>>,
}

impl StaticAuth {
    pub fn new(identity: Option<AgentIdentity>) -> Self {
        Self {
            identity: RwLock::new(identity),
        }
    }

    /// Identity from config; requires both a non-empty agent id and token.
    pub fn from_config(config: &AuthConfig) -> Self {
        let agent_id = config.agent_id.as_deref().map(str::trim).filter(|a| !a.is_empty());
        let token = config.token.as_deref().map(str::trim).filter(|t| !t.is_empty());

        let identity = match (agent_id, token) {
            (Some(agent_id), Some(token)) => Some(AgentIdentity {
                agent_id: agent_id.to_string(),
                token: token.to_string(),
            }),
            _ => None,
        };
        Self::new(identity)
    }

    /// Replace the signed-in identity (re-login).
    pub fn set_identity(&self, identity: Option<AgentIdentity>) {
        *self.identity.write().unwrap_or_else(|e| e.into_inner()) = identity;
    }
}

impl AuthContext for StaticAuth {
    fn identity(&self) -> Option<AgentIdentity> {
        self.identity
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn sign_out(&self) {
        let previous = self
            .identity
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(identity) = previous {
            tracing::info!(agent_id = %identity.agent_id, "Signed out");
        }
    }
}
