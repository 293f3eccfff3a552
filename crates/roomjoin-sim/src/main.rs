//! Room join simulation binary.
//!
//! # Usage
//!
//! ```bash
//! # Two nickname conflicts, then the third candidate gets in
//! roomjoin-sim --room dev@conference.example.org --nickname alice --reject 409 --reject 409
//!
//! # Password-protected room without a password
//! roomjoin-sim --password-protected
//!
//! # Keep conflicting, negotiate on a worker, give up after three calls
//! roomjoin-sim --mode async --reject 409 --reject 409 --reject 409 --reject 409 --cancel-after 3
//! ```

use std::{process::ExitCode, time::Duration};

use clap::{Parser, ValueEnum};
use roomjoin_core::ExecutionMode;
use roomjoin_sim::SimulationConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Room join negotiation simulator
#[derive(Parser, Debug)]
#[command(name = "roomjoin-sim")]
#[command(about = "Simulate joining a conference room against scripted collaborators")]
#[command(version)]
struct Args {
    /// Room to join (local@service)
    #[arg(short, long, default_value = "lobby@conference.example.org")]
    room: String,

    /// Base nickname
    #[arg(short, long, default_value = "guest")]
    nickname: String,

    /// Room password
    #[arg(short, long)]
    password: Option<String>,

    /// Report the room as password protected
    #[arg(long)]
    password_protected: bool,

    /// Make room discovery fail
    #[arg(long)]
    discovery_fails: bool,

    /// Rejection code answered by the transport, in order (repeatable)
    #[arg(long = "reject", value_name = "CODE")]
    rejections: Vec<u16>,

    /// Start with a live membership for the room
    #[arg(long)]
    already_joined: bool,

    /// Execution mode
    #[arg(long, value_enum, default_value_t = Mode::Blocking)]
    mode: Mode,

    /// Cancel after this many join calls
    #[arg(long, value_name = "N")]
    cancel_after: Option<usize>,

    /// Simulated latency of each join call in milliseconds
    #[arg(long, value_name = "MS")]
    latency_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Negotiate on the calling thread
    Blocking,
    /// Negotiate on a worker and deliver through the completion queue
    Async,
}

impl From<Mode> for ExecutionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Blocking => Self::Blocking,
            Mode::Async => Self::Async,
        }
    }
}

impl From<Args> for SimulationConfig {
    fn from(args: Args) -> Self {
        Self {
            room: args.room,
            nickname: args.nickname,
            password: args.password,
            password_protected: args.password_protected,
            discovery_fails: args.discovery_fails,
            rejections: args.rejections,
            already_joined: args.already_joined,
            mode: args.mode.into(),
            cancel_after: args.cancel_after,
            latency: args.latency_ms.map(Duration::from_millis),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = SimulationConfig::from(args);
    match roomjoin_sim::run(&config).await {
        Ok(report) => {
            match report.outcome.user_message() {
                Some(message) => tracing::warn!(
                    calls = report.transport_calls,
                    %message,
                    "join did not succeed"
                ),
                None => tracing::info!(
                    calls = report.transport_calls,
                    nickname = ?report.outcome.nickname(),
                    active = ?report.active_room.as_ref().map(ToString::to_string),
                    "joined room"
                ),
            }
            if report.is_joined() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        },
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            ExitCode::FAILURE
        },
    }
}
