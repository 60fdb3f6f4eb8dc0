//! Subcommand implementations.

pub mod entities;
pub mod login;
pub mod metadata;
pub mod query;
pub mod service;

use anyhow::{Context, Result};
use cuba_rest::{CubaClient, CubaClientBuilder, RefreshToken};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::prompt::PromptProvider;

/// Client builder for the connection arguments, with the interactive
/// credential provider installed.
pub fn client_builder(args: &ConnectionArgs) -> CubaClientBuilder {
    let mut builder = CubaClient::builder(&args.endpoint)
        .client_credentials(&args.client_id, &args.client_secret)
        .credential_provider(PromptProvider::new(
            args.username.clone(),
            args.password.clone(),
        ));

    if let Some(token) = args.refresh_token.as_deref().filter(|t| !t.is_empty()) {
        builder = builder.refresh_token(RefreshToken::new(token));
    }

    builder
}

/// Build a client from the connection arguments.
///
/// A refresh token obtained during the command is printed to stderr so it
/// can be reused through `CUBA_REFRESH_TOKEN`.
pub fn connect(args: &ConnectionArgs) -> Result<CubaClient> {
    client_builder(args)
        .on_refresh_token_updated(|token: &RefreshToken| {
            output::note(&format!("New refresh token: {}", token.as_str()));
        })
        .build()
        .context("Invalid connection parameters")
}
