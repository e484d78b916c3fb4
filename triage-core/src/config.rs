use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct TriageConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

/// Credentials for the signed-in agent. Both fields must be present for
/// the inbox to issue any request.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    pub agent_id: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl TriageConfig {
    /// Load from a TOML file, with `TRIAGE__SECTION__KEY` environment
    /// variables taking precedence. A leading `~` in `path` is expanded.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let path = shellexpand::tilde(path);
        let s = Config::builder()
            .add_source(File::with_name(&path))
            .add_source(Environment::with_prefix("TRIAGE").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
