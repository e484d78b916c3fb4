//! Inbox controller: owns the triage view state and its load lifecycle
//!
//! State moves `Idle → Loading → {Loaded, Failed, SignedOut}`. Loads are
//! triggered by caller-owned events (`mount`, `select_tab`, `refresh`,
//! `identity_changed`) and the result is published on a `watch` channel.
//!
//! Every load is stamped with a generation number and the identity (agent
//! id and token) it was issued for. A completion is applied only while its
//! generation is still the latest and that same login is current; anything
//! else is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::{AgentIdentity, AuthContext, StaticAuth};
use crate::classify::classify;
use crate::client::{FetchError, HttpSessionClient, SessionSource};
use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::models::{Session, Tab};
use crate::query::{build_query, SessionQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
    SignedOut,
}

/// Snapshot of the inbox as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxState {
    pub selected_tab: Tab,
    pub sessions: Vec<Session>,
    pub loading: bool,
    pub phase: InboxPhase,
}

impl InboxState {
    fn new(selected_tab: Tab) -> Self {
        Self {
            selected_tab,
            sessions: Vec::new(),
            loading: false,
            phase: InboxPhase::Idle,
        }
    }
}

/// What a single trigger ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { count: usize },
    Failed,
    SignedOut,
    /// No agent identity; no request was issued.
    Skipped,
    /// A newer load or an identity change made this result stale.
    Superseded,
}

struct Ticket {
    generation: u64,
    tab: Tab,
    identity: AgentIdentity,
    query: SessionQuery,
}

pub struct InboxController {
    source: Arc<dyn SessionSource>,
    auth: Arc<dyn AuthContext>,
    state: watch::Sender<InboxState>,
    generation: AtomicU64,
}

impl InboxController {
    pub fn new(source: Arc<dyn SessionSource>, auth: Arc<dyn AuthContext>) -> Self {
        Self::with_tab(source, auth, Tab::default())
    }

    pub fn with_tab(
        source: Arc<dyn SessionSource>,
        auth: Arc<dyn AuthContext>,
        tab: Tab,
    ) -> Self {
        let (state, _) = watch::channel(InboxState::new(tab));
        Self {
            source,
            auth,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Wire an HTTP-backed controller from config. The returned auth handle
    /// lets the caller re-login and then call `identity_changed`.
    pub fn from_config(
        config: &TriageConfig,
        tab: Tab,
    ) -> Result<(Self, Arc<StaticAuth>), TriageError> {
        let source = Arc::new(HttpSessionClient::new(&config.api)?);
        let auth = Arc::new(StaticAuth::from_config(&config.auth));
        Ok((Self::with_tab(source, auth.clone(), tab), auth))
    }

    pub fn subscribe(&self) -> watch::Receiver<InboxState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> InboxState {
        self.state.borrow().clone()
    }

    /// Initial load for the view.
    pub async fn mount(&self) -> FetchOutcome {
        self.load().await
    }

    /// Repeat the current tab's query. Allowed from any state.
    pub async fn refresh(&self) -> FetchOutcome {
        self.load().await
    }

    /// Switch tabs. Rows from the previous tab are cleared at once and any
    /// in-flight load is invalidated.
    pub async fn select_tab(&self, tab: Tab) -> FetchOutcome {
        self.state.send_if_modified(|s| {
            if s.selected_tab == tab {
                return false;
            }
            self.generation.fetch_add(1, Ordering::SeqCst);
            s.selected_tab = tab;
            s.sessions.clear();
            s.loading = false;
            s.phase = InboxPhase::Idle;
            true
        });
        self.load().await
    }

    /// The signed-in agent changed (re-login or sign-out). Data belonging to
    /// the previous agent is dropped before reloading.
    pub async fn identity_changed(&self) -> FetchOutcome {
        self.state.send_modify(|s| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            s.sessions.clear();
            s.loading = false;
            s.phase = InboxPhase::Idle;
        });
        self.load().await
    }

    async fn load(&self) -> FetchOutcome {
        let Some(identity) = self.auth.identity() else {
            tracing::debug!("No agent identity, skipping inbox load");
            return FetchOutcome::Skipped;
        };

        let mut ticket = None;
        self.state.send_if_modified(|s| {
            let Some(query) = build_query(s.selected_tab, Some(&identity.agent_id)) else {
                return false;
            };
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            s.loading = true;
            s.phase = InboxPhase::Loading;
            ticket = Some(Ticket {
                generation,
                tab: s.selected_tab,
                identity: identity.clone(),
                query,
            });
            true
        });

        let Some(ticket) = ticket else {
            tracing::debug!("Empty agent id, skipping inbox load");
            return FetchOutcome::Skipped;
        };

        tracing::debug!(
            tab = %ticket.tab,
            generation = ticket.generation,
            source = self.source.name(),
            "Loading inbox"
        );

        let result = self
            .source
            .fetch_sessions(&ticket.query, &ticket.identity.token)
            .await;

        self.complete(ticket, result)
    }

    fn complete(&self, ticket: Ticket, result: Result<Vec<Session>, FetchError>) -> FetchOutcome {
        if !self.is_current(ticket.generation) {
            tracing::debug!(
                tab = %ticket.tab,
                generation = ticket.generation,
                "Discarding superseded inbox response"
            );
            return FetchOutcome::Superseded;
        }

        if self.auth.identity().as_ref() != Some(&ticket.identity) {
            tracing::debug!(
                tab = %ticket.tab,
                generation = ticket.generation,
                "Identity changed while loading, discarding inbox response"
            );
            self.apply(ticket.generation, |s| {
                s.sessions.clear();
                s.loading = false;
                s.phase = InboxPhase::Idle;
            });
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(raw) => {
                let received = raw.len();
                let sessions = classify(ticket.tab, raw);
                let count = sessions.len();
                let applied = self.apply(ticket.generation, |s| {
                    s.sessions = sessions;
                    s.loading = false;
                    s.phase = InboxPhase::Loaded;
                });
                if !applied {
                    return FetchOutcome::Superseded;
                }
                tracing::debug!(tab = %ticket.tab, received, count, "Inbox loaded");
                FetchOutcome::Loaded { count }
            }
            Err(e) if e.is_auth_expired() => {
                let applied = self.apply(ticket.generation, |s| {
                    s.loading = false;
                    s.phase = InboxPhase::SignedOut;
                });
                if !applied {
                    return FetchOutcome::Superseded;
                }
                tracing::info!(tab = %ticket.tab, "Session token rejected, signing out");
                self.auth.sign_out();
                FetchOutcome::SignedOut
            }
            Err(e) => {
                let applied = self.apply(ticket.generation, |s| {
                    s.sessions.clear();
                    s.loading = false;
                    s.phase = InboxPhase::Failed;
                });
                if !applied {
                    return FetchOutcome::Superseded;
                }
                tracing::warn!(
                    tab = %ticket.tab,
                    source = self.source.name(),
                    error = %e,
                    "Inbox load failed"
                );
                FetchOutcome::Failed
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Mutate state only if `generation` is still the latest load.
    fn apply(&self, generation: u64, update: impl FnOnce(&mut InboxState)) -> bool {
        self.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            update(s);
            true
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
