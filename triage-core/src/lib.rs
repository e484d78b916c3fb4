pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod inbox;
pub mod models;
pub mod query;

pub use auth::{AgentIdentity, AuthContext, StaticAuth};
pub use classify::{classify, is_bot_agent};
pub use client::{FetchError, HttpSessionClient, SessionSource};
pub use config::TriageConfig;
pub use error::TriageError;
pub use inbox::{FetchOutcome, InboxController, InboxPhase, InboxState};
pub use models::{Session, SessionStatus, Tab};
pub use query::{build_query, SessionQuery};
