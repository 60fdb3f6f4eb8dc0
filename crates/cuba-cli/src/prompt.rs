//! Interactive credential provider.

use std::io::{self, BufRead, Write};

use cuba_rest::{CredentialDecision, CredentialProvider, CredentialReason, Credentials};

/// Supplies credentials from command-line arguments first, then from stdin.
///
/// Preset credentials are used once. When they are rejected, or when none
/// were given, the user is prompted on stderr. End of input cancels.
#[derive(Debug, Default)]
pub struct PromptProvider {
    username: Option<String>,
    password: Option<String>,
}

impl PromptProvider {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    fn prompt(&self, reason: CredentialReason, cached: Option<&Credentials>) -> io::Result<Option<Credentials>> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stderr = io::stderr();

        if reason == CredentialReason::IncorrectCredentials {
            writeln!(stderr, "Incorrect username or password.")?;
        }

        let default_user = cached
            .map(|c| c.username().to_string())
            .or_else(|| self.username.clone());

        match &default_user {
            Some(user) => write!(stderr, "Username [{user}]: ")?,
            None => write!(stderr, "Username: ")?,
        }
        stderr.flush()?;
        let Some(username) = read_line(&mut input)? else {
            return Ok(None);
        };
        let username = match (username.is_empty(), default_user) {
            (true, Some(user)) => user,
            _ => username,
        };

        write!(stderr, "Password: ")?;
        stderr.flush()?;
        let Some(password) = read_line(&mut input)? else {
            return Ok(None);
        };

        Ok(Some(Credentials::new(username, password)))
    }
}

impl CredentialProvider for PromptProvider {
    fn request_credentials(
        &self,
        reason: CredentialReason,
        cached: Option<&Credentials>,
    ) -> CredentialDecision {
        if let (CredentialReason::Empty, Some(username), Some(password)) =
            (reason, &self.username, &self.password)
        {
            return CredentialDecision::Continue(Credentials::new(username, password));
        }

        match self.prompt(reason, cached) {
            Ok(Some(credentials)) => CredentialDecision::Continue(credentials),
            Ok(None) => CredentialDecision::Cancel,
            Err(error) => {
                tracing::warn!(%error, "failed to read credentials");
                CredentialDecision::Cancel
            }
        }
    }
}

/// Read one line without its terminator. `None` at end of input.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
