//! Login command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use cuba_rest::{
    CredentialDecision, CredentialProvider, CredentialReason, Credentials, ErrorKind, RefreshToken,
};

use crate::cli::ConnectionArgs;
use crate::commands::client_builder;
use crate::output;
use crate::prompt::PromptProvider;

/// Password attempts before giving up.
const LOGIN_ATTEMPTS: u32 = 3;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Print only the refresh token
    #[arg(long)]
    pub quiet: bool,
}

pub async fn run(connection: &ConnectionArgs, args: LoginArgs) -> Result<()> {
    // The token is printed below, so no refresh observer here
    let client = client_builder(connection)
        .build()
        .context("Invalid connection parameters")?;
    let provider = PromptProvider::new(connection.username.clone(), connection.password.clone());

    let mut reason = CredentialReason::Empty;
    let mut cached: Option<Credentials> = None;
    let mut attempt = 1;

    let (credentials, token): (Credentials, RefreshToken) = loop {
        let credentials = match provider.request_credentials(reason, cached.as_ref()) {
            CredentialDecision::Continue(credentials) => credentials,
            CredentialDecision::Cancel => bail!("Login cancelled"),
        };

        eprintln!("{}", "Logging in...".dimmed());

        match client.request_refresh_token(&credentials).await {
            Ok(token) => break (credentials, token),
            Err(error) if error.kind() == ErrorKind::AccessRejected && attempt < LOGIN_ATTEMPTS => {
                tracing::debug!(attempt, "login rejected");
                reason = CredentialReason::IncorrectCredentials;
                cached = Some(credentials);
                attempt += 1;
            }
            Err(error) => return Err(error).context("Failed to login"),
        }
    };

    if args.quiet {
        println!("{}", token.as_str());
        return Ok(());
    }

    output::success("Logged in successfully");
    println!();
    output::field("Endpoint", client.endpoint().as_str());
    output::field("User", credentials.username());
    output::field("Refresh token", token.as_str());

    Ok(())
}
