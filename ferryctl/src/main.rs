use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ferry_model::{ConnectionId, ConnectorRole, DefinitionId, InstanceId};

mod commands;

#[derive(Parser)]
#[command(name = "ferryctl", about = "Inspect connectors and submit sync jobs")]
struct Cli {
    /// Ferry settings file (TOML or JSON); overrides $FERRY_CONFIG_PATH
    #[arg(long, global = true, value_name = "FILE")]
    ferry_config: Option<PathBuf>,
    /// State snapshot to load instead of the configured `state_path`
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connector definitions
    Definitions {
        #[command(subcommand)]
        command: DefinitionsCommand,
    },
    /// Print the cached specification for a definition
    Spec {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        definition_id: DefinitionId,
    },
    /// Validate a connector configuration file against its specification
    Validate {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        definition_id: DefinitionId,
        /// JSON file holding the connection configuration
        #[arg(long = "config", value_name = "FILE")]
        connection_config: PathBuf,
    },
    /// Validate an update to a stored instance; masked secrets keep their stored values
    ValidateUpdate {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        instance_id: InstanceId,
        /// JSON file holding the updated connection configuration
        #[arg(long = "config", value_name = "FILE")]
        connection_config: PathBuf,
    },
    /// Submit a sync job for a connection
    Sync {
        #[arg(long)]
        connection_id: ConnectionId,
    },
    /// Submit a reset job for a connection
    Reset {
        #[arg(long)]
        connection_id: ConnectionId,
    },
}

#[derive(Subcommand)]
enum DefinitionsCommand {
    /// List definitions for one role, sorted by name
    List {
        #[arg(long, value_enum)]
        role: RoleArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Source,
    Destination,
}

impl From<RoleArg> for ConnectorRole {
    fn from(val: RoleArg) -> Self {
        match val {
            RoleArg::Source => ConnectorRole::Source,
            RoleArg::Destination => ConnectorRole::Destination,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.ferry_config, cli.state).await?;

    match cli.command {
        Command::Definitions {
            command: DefinitionsCommand::List { role },
        } => ctx.list_definitions(role.into()).await,
        Command::Spec {
            role,
            definition_id,
        } => ctx.print_spec(role.into(), definition_id).await,
        Command::Validate {
            role,
            definition_id,
            connection_config,
        } => {
            ctx.validate(role.into(), definition_id, &connection_config)
                .await
        }
        Command::ValidateUpdate {
            role,
            instance_id,
            connection_config,
        } => {
            ctx.validate_update(role.into(), instance_id, &connection_config)
                .await
        }
        Command::Sync { connection_id } => ctx.sync(connection_id).await,
        Command::Reset { connection_id } => ctx.reset(connection_id).await,
    }
}
