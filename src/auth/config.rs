use anyhow::{Context, Result};
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;

const GENERATED_KEY_BYTES: usize = 32;

/// Process-wide secrets for the authenticator.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    secret_key: SecretString,
    password_salt: SecretString,
}

impl AuthConfig {
    #[must_use]
    pub fn new(secret_key: SecretString, password_salt: SecretString) -> Self {
        Self {
            secret_key,
            password_salt,
        }
    }

    #[must_use]
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    #[must_use]
    pub fn password_salt(&self) -> &SecretString {
        &self.password_salt
    }
}

/// Create a random HMAC key for deployments that did not configure one.
///
/// Tokens signed with it stop validating once the process exits.
/// # Errors
/// Returns an error if the OS random source fails.
pub fn generate_secret_key() -> Result<SecretString> {
    let mut bytes = [0u8; GENERATED_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate secret key")?;
    Ok(SecretString::from(hex::encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn generate_secret_key_is_random_hex() -> Result<()> {
        let first = generate_secret_key()?;
        let second = generate_secret_key()?;
        assert_eq!(first.expose_secret().len(), GENERATED_KEY_BYTES * 2);
        assert!(first
            .expose_secret()
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.expose_secret(), second.expose_secret());
        Ok(())
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AuthConfig::new(
            SecretString::from("super-secret-key"),
            SecretString::from("super-secret-salt"),
        );
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(!rendered.contains("super-secret-salt"));
    }
}
