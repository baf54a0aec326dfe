//! Self-verifying session tokens: `base64(username) "." HEX(HMAC-SHA256(key, username))`.

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing token separator")]
    MissingSeparator,
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64 encoding")]
    Base64,
    #[error("username is not valid utf-8")]
    Utf8,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid signing key")]
    InvalidKey,
}

/// Signs usernames and validates the resulting tokens with a single HMAC key.
///
/// The keyed MAC state is prepared once and cloned for every operation.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// # Errors
    /// Returns `TokenError::InvalidKey` if the HMAC cannot be keyed.
    pub fn new(secret_key: &SecretString) -> Result<Self, TokenError> {
        let mac = HmacSha256::new_from_slice(secret_key.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidKey)?;
        Ok(Self { mac })
    }

    /// HMAC-SHA256 over the username, uppercase hex.
    #[must_use]
    pub fn sign(&self, username: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(username.as_bytes());
        hex::encode_upper(mac.finalize().into_bytes())
    }

    #[must_use]
    pub fn issue(&self, username: &str) -> String {
        format!(
            "{}{SEPARATOR}{}",
            Base64::encode_string(username.as_bytes()),
            self.sign(username)
        )
    }

    /// Return the username carried by `token` if its signature checks out.
    ///
    /// # Errors
    /// Returns a `TokenError` describing why the token was rejected. Callers are
    /// expected to treat every variant the same way (anonymous visitor).
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let (encoded, signature) = token
            .split_once(SEPARATOR)
            .ok_or(TokenError::MissingSeparator)?;

        if signature.contains(SEPARATOR) {
            return Err(TokenError::TokenFormat);
        }

        let raw = Base64::decode_vec(encoded).map_err(|_| TokenError::Base64)?;
        let username = String::from_utf8(raw).map_err(|_| TokenError::Utf8)?;

        // Signatures are minted as uppercase hex; anything else cannot match.
        if !is_upper_hex(signature) {
            return Err(TokenError::InvalidSignature);
        }
        let supplied = hex::decode(signature).map_err(|_| TokenError::InvalidSignature)?;

        let mut mac = self.mac.clone();
        mac.update(username.as_bytes());
        mac.verify_slice(&supplied)
            .map_err(|_| TokenError::InvalidSignature)?;

        Ok(username)
    }
}

fn is_upper_hex(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}
