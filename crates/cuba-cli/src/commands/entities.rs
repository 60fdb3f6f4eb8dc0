//! Entity subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cuba_rest::EntityListParams;

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct EntitiesCommand {
    #[command(subcommand)]
    pub command: EntitiesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EntitiesSubcommand {
    /// List entities of a type
    List(ListArgs),

    /// Fetch a single entity
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Entity metaclass, e.g. sec$User
    pub metaclass: String,

    /// View used to render the entities
    #[arg(long)]
    pub view: Option<String>,

    /// Maximum number of entities to return
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Number of entities to skip
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<i64>,

    /// Attribute to sort by, prefix with '-' for descending
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Entity metaclass, e.g. sec$User
    pub metaclass: String,

    /// Entity id (UUID)
    pub id: String,

    /// View used to render the entity
    #[arg(long)]
    pub view: Option<String>,
}

pub async fn handle(connection: &ConnectionArgs, cmd: EntitiesCommand) -> Result<()> {
    match cmd.command {
        EntitiesSubcommand::List(args) => list(connection, args).await,
        EntitiesSubcommand::Get(args) => get(connection, args).await,
    }
}

fn list_params(args: &ListArgs) -> Result<EntityListParams> {
    let mut params = EntityListParams::new();
    if let Some(view) = &args.view {
        params = params.view(view);
    }
    if let Some(limit) = args.limit {
        params = params.limit(limit).context("Invalid --limit")?;
    }
    if let Some(offset) = args.offset {
        params = params.offset(offset).context("Invalid --offset")?;
    }
    if let Some(sort) = &args.sort {
        params = params.sort(sort);
    }
    Ok(params)
}

async fn list(connection: &ConnectionArgs, args: ListArgs) -> Result<()> {
    let params = list_params(&args)?;
    let client = connect(connection)?;

    let entities = client
        .list_entities_raw(&args.metaclass, &params)
        .await
        .context("Failed to list entities")?;

    output::json_lines(&entities, args.pretty)
}

async fn get(connection: &ConnectionArgs, args: GetArgs) -> Result<()> {
    let client = connect(connection)?;

    let entity = client
        .get_entity_raw(&args.metaclass, &args.id, args.view.as_deref())
        .await
        .context("Failed to get entity")?;

    output::json_pretty(&entity)
}
