//! triage: agent inbox view over the support admin sessions API
//!
//! Runs one inbox load for the chosen tab and prints what the view would
//! show: the agent's open sessions, the shared unassigned/bot-handled
//! queue, or resolved history.
//!
//! # Subcommands
//! - `list [--tab <tab>] [--json]`: load a tab and print its sessions
//!
//! Exit status: 0 loaded, 1 failed, 2 signed out (token rejected),
//! 3 no agent identity configured.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use triage_core::{FetchOutcome, InboxController, Session, Tab, TriageConfig};

const LAST_MESSAGE_PREVIEW: usize = 80;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "triage", version, about = "Support inbox triage for human agents")]
struct Cli {
    #[arg(short, long, default_value = "triage.toml")]
    config: String,

    /// Admin API base URL (overrides api.base_url)
    #[arg(long, env = "TRIAGE_API_URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load one inbox tab and print its sessions
    List {
        /// Tab to load: active, unassigned or resolved
        #[arg(short, long, default_value_t = Tab::Active)]
        tab: Tab,

        /// Output the published session list as a JSON array
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Output
// ============================================================================

/// `updatedAt` as `YYYY-MM-DD HH:MM UTC`, or verbatim when it
/// is not RFC 3339.
fn format_updated_at(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

fn render_session(session: &Session) -> String {
    let assignee = session.assignee().unwrap_or("unassigned");
    let preview: String = session
        .last_message
        .chars()
        .take(LAST_MESSAGE_PREVIEW)
        .collect();

    format!(
        "{} [{}] {}\nUpdated: {}\n{}\n",
        session.detail_path(),
        session.status,
        assignee,
        format_updated_at(&session.updated_at),
        preview
    )
}

fn exit_code(outcome: FetchOutcome) -> i32 {
    match outcome {
        FetchOutcome::Loaded { .. } => 0,
        FetchOutcome::Failed | FetchOutcome::Superseded => 1,
        FetchOutcome::SignedOut => 2,
        FetchOutcome::Skipped => 3,
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn do_list(config: &TriageConfig, tab: Tab, json_output: bool) -> anyhow::Result<i32> {
    let (controller, _auth) = InboxController::from_config(config, tab)?;

    let outcome = controller.mount().await;
    let state = controller.snapshot();

    match outcome {
        FetchOutcome::SignedOut => {
            eprintln!("triage: session expired, sign in again and update auth.token");
        }
        FetchOutcome::Skipped => {
            eprintln!("triage: no agent identity configured (auth.agent_id / auth.token)");
        }
        FetchOutcome::Failed | FetchOutcome::Superseded => {
            eprintln!("triage: could not load the {} tab (see log for details)", tab);
        }
        FetchOutcome::Loaded { .. } => {}
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&state.sessions)?);
    } else if state.sessions.is_empty() {
        eprintln!("No sessions in {}", tab);
    } else {
        for session in &state.sessions {
            println!("{}", render_session(session));
        }
    }

    Ok(exit_code(outcome))
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match TriageConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };
    if let Some(server) = cli.server {
        config.api.base_url = server;
    }

    // Init logging (stderr keeps stdout clean for --json)
    let default_level = config
        .service
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .init();

    let code = match cli.command {
        Commands::List { tab, json } => do_list(&config, tab, json).await?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
