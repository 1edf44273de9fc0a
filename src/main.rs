//! CHM6 Board Management CLI
//!
//! Entry point for the board management command line tool. Each
//! invocation builds one managed-entity record (host-board config, DCO
//! state, or TOM presence map), submits it to the remote management
//! service over its gRPC CRUD surface, prints the acknowledgement, and
//! exits with a code reflecting the outcome.
//!
//! # Flow
//! 1. Parse arguments and load configuration
//! 2. Build the requested record
//! 3. Connect to the management service and submit the record
//! 4. Print the acknowledgement or the error
//!
//! # Exit codes
//! - 0: success
//! - 1: remote call failure
//! - 2: invalid argument
//! - 3: configuration error

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use chm6_board_cli::builder::{build_record, BuilderError, EntityKind, Operation};
use chm6_board_cli::client::{CrudClient, RemoteCallError};
use chm6_board_cli::config::{ConfigError, Settings};
use chm6_board_cli::proto::chm6::board::v1::CrudResponse;

mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const REMOTE_FAILURE: i32 = 1;
    pub const INVALID_ARGUMENT: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
}

#[derive(Parser, Debug)]
#[command(
    name = "chm6board",
    about = "CHM6 board management CLI",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config/application.yml", global = true)]
    config: String,

    /// Print the server acknowledgement as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    entity: EntityCommand,
}

#[derive(Subcommand, Debug)]
enum EntityCommand {
    /// Host-board configuration records
    Board {
        #[command(subcommand)]
        operation: OpCommand,
    },
    /// DCO transceiver state records
    Dco {
        #[command(subcommand)]
        operation: OpCommand,
    },
    /// TOM presence map records
    Tom {
        #[command(subcommand)]
        operation: OpCommand,
    },
}

#[derive(Subcommand, Debug)]
enum OpCommand {
    /// Create the record on the management service
    Create { entity_id: String },
    /// Update the record on the management service
    Update { entity_id: String },
    /// Delete the record from the management service
    Delete { entity_id: String },
}

impl EntityCommand {
    fn kind(&self) -> EntityKind {
        match self {
            EntityCommand::Board { .. } => EntityKind::Board,
            EntityCommand::Dco { .. } => EntityKind::Dco,
            EntityCommand::Tom { .. } => EntityKind::Tom,
        }
    }

    fn operation(&self) -> &OpCommand {
        match self {
            EntityCommand::Board { operation }
            | EntityCommand::Dco { operation }
            | EntityCommand::Tom { operation } => operation,
        }
    }
}

impl OpCommand {
    fn parts(&self) -> (Operation, &str) {
        match self {
            OpCommand::Create { entity_id } => (Operation::Create, entity_id),
            OpCommand::Update { entity_id } => (Operation::Update, entity_id),
            OpCommand::Delete { entity_id } => (Operation::Delete, entity_id),
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    InvalidArgument(#[from] BuilderError),

    #[error("{0}")]
    Remote(#[from] RemoteCallError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => exit_codes::CONFIG_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGUMENT,
            CliError::Remote(_) => exit_codes::REMOTE_FAILURE,
        }
    }
}

/// Initializes structured logging on stderr, leaving stdout for the
/// acknowledgement. Log level is configurable via `RUST_LOG`.
fn setup_logging() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

fn print_acknowledgement(ack: &CrudResponse, json: bool) {
    if json {
        let rendered = serde_json::to_string_pretty(ack).unwrap_or_else(|_| format!("{ack:?}"));
        println!("{rendered}");
    } else {
        println!("{ack:?}");
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let (operation, entity_id) = cli.entity.operation().parts();
    let kind = cli.entity.kind();

    // Fail fast on a bad id before touching configuration or the network.
    let record = build_record(kind, entity_id, operation)?;
    info!(
        "Submitting {:?} for {} ({:?})",
        operation,
        record.config_id(),
        kind
    );

    let settings = Settings::load(&cli.config)?;
    let mut client = CrudClient::connect(&settings.grpc.client).await?;
    let ack = client.submit(record, operation).await?;

    print_acknowledgement(&ack, cli.json);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = setup_logging() {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(exit_codes::CONFIG_ERROR);
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
