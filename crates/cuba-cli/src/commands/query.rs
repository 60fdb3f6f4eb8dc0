//! Query command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Entity metaclass the query is declared for
    pub metaclass: String,

    /// Query name
    pub name: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(connection: &ConnectionArgs, args: QueryArgs) -> Result<()> {
    let client = connect(connection)?;

    let entities = client
        .query_raw(&args.metaclass, &args.name)
        .await
        .context("Failed to run query")?;

    output::json_lines(&entities, args.pretty)
}
