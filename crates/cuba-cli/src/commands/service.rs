//! Service command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Service name, e.g. app_OrderService
    pub service: String,

    /// Method name
    pub method: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,
}

pub async fn run(connection: &ConnectionArgs, args: ServiceArgs) -> Result<()> {
    let body = args
        .body
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--body is not valid JSON")?;

    let client = connect(connection)?;

    let result: Value = client
        .execute_service(&args.service, &args.method, body)
        .await
        .context("Service call failed")?;

    output::json_pretty(&result)
}
