use crate::auth::password::hash_password;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;

#[derive(Debug)]
pub struct Args {
    pub password: SecretString,
    pub password_salt: SecretString,
}

/// Print the salted hash to store in the user file.
/// # Errors
/// Returns an error if stdout cannot be written.
pub fn execute(args: &Args) -> Result<()> {
    writeln!(std::io::stdout().lock(), "{}", digest(args))?;
    Ok(())
}

fn digest(args: &Args) -> String {
    hash_password(
        args.password.expose_secret(),
        args.password_salt.expose_secret(),
    )
}
