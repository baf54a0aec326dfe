use crate::cli::actions::{hash, server, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub_m) = matches.subcommand_matches("hash") {
        return Ok(Action::Hash(hash::Args {
            password: required_secret(sub_m, "password")?,
            password_salt: required_secret(sub_m, "password-salt")?,
        }));
    }

    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let users = matches
        .get_one::<String>("users")
        .map(PathBuf::from)
        .context("missing required argument: --users")?;
    let secret_key = matches
        .get_one::<String>("secret-key")
        .filter(|key| !key.is_empty())
        .map(|key| SecretString::from(key.as_str()));
    let password_salt = required_secret(matches, "password-salt")?;
    let login_template = matches.get_one::<String>("login-template").map(PathBuf::from);

    Ok(Action::Server(server::Args {
        port,
        users,
        secret_key,
        password_salt,
        login_template,
    }))
}

fn required_secret(matches: &clap::ArgMatches, id: &str) -> Result<SecretString> {
    matches
        .get_one::<String>(id)
        .map(|value| SecretString::from(value.as_str()))
        .with_context(|| format!("missing required argument: {id}"))
}
