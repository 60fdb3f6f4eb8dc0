//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::entities::EntitiesCommand;
use crate::commands::login::LoginArgs;
use crate::commands::metadata::MetadataCommand;
use crate::commands::query::QueryArgs;
use crate::commands::service::ServiceArgs;

/// CUBA REST API CLI tool.
#[derive(Parser, Debug)]
#[command(name = "cuba")]
#[command(author, version = env!("CUBA_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where and how to connect.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// REST API base URL, e.g. http://localhost:8080/app/rest/v2
    #[arg(long, env = "CUBA_ENDPOINT", global = true, default_value = "http://localhost:8080/app/rest/v2")]
    pub endpoint: String,

    /// OAuth client id
    #[arg(long, env = "CUBA_CLIENT_ID", global = true, default_value = "client")]
    pub client_id: String,

    /// OAuth client secret
    #[arg(long, env = "CUBA_CLIENT_SECRET", global = true, default_value = "secret", hide_env_values = true)]
    pub client_secret: String,

    /// Refresh token from a previous login
    #[arg(long, env = "CUBA_REFRESH_TOKEN", global = true, hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Username for the password grant (prompted for if missing)
    #[arg(long, env = "CUBA_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for the password grant (prompted for if missing)
    #[arg(long, env = "CUBA_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtain a refresh token with username and password
    Login(LoginArgs),

    /// Entity operations
    Entities(EntitiesCommand),

    /// Run a named entity query
    Query(QueryArgs),

    /// Call a middleware service method
    Service(ServiceArgs),

    /// Inspect the server's entity, enum and datatype metadata
    Metadata(MetadataCommand),
}
