//! Read-only user directory loaded once at startup.

use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read user file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid user file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty username in user file")]
    EmptyUsername,
    #[error("password hash for {0} is not a SHA-256 hex digest")]
    InvalidHash(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(skip)]
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub balance: f64,
}

/// Immutable username -> record mapping.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    /// Build a directory from records, validating each one.
    ///
    /// # Errors
    /// Returns an error for empty usernames or malformed password hashes.
    pub fn new<I>(records: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = UserRecord>,
    {
        let mut users = HashMap::new();
        for record in records {
            if record.username.is_empty() {
                return Err(DirectoryError::EmptyUsername);
            }
            if !is_sha256_hex(&record.password_hash) {
                return Err(DirectoryError::InvalidHash(record.username));
            }
            users.insert(record.username.clone(), record);
        }
        Ok(Self { users })
    }

    /// Parse the JSON user file format:
    /// `{"alice": {"name": "Alice", "password": "<hex>", "balance": 100}}`.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a record is invalid.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let parsed: HashMap<String, UserRecord> = serde_json::from_str(json)?;
        Self::new(parsed.into_iter().map(|(username, mut record)| {
            record.username = username;
            record
        }))
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, DirectoryError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DirectoryError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;

    const HASH: &str = "fccba15a4d0079955fef7d5b4ab0d115f8992cd2287a4e6b957af9415cc5cbbb";

    fn users_json() -> String {
        format!(
            r#"{{
                "alice": {{"name": "Alice", "password": "{HASH}", "balance": 100000}},
                "bob": {{"name": "Bob", "password": "{}", "balance": 12.5}}
            }}"#,
            HASH.to_uppercase()
        )
    }

    #[test]
    fn from_json_keys_records_by_username() -> Result<()> {
        let directory = UserDirectory::from_json(&users_json())?;
        assert_eq!(directory.len(), 2);

        let alice = directory.get("alice");
        assert_eq!(alice.map(|u| u.username.as_str()), Some("alice"));
        assert_eq!(alice.map(|u| u.display_name.as_str()), Some("Alice"));
        assert_eq!(alice.map(|u| u.balance), Some(100_000.0));
        assert_eq!(directory.get("bob").map(|u| u.balance), Some(12.5));
        Ok(())
    }

    #[test]
    fn lookup_is_exact() -> Result<()> {
        let directory = UserDirectory::from_json(&users_json())?;
        assert!(directory.get("Alice").is_none());
        assert!(directory.get("alice ").is_none());
        assert!(directory.get("carol").is_none());
        Ok(())
    }

    #[test]
    fn from_json_rejects_bad_hash() {
        let json = r#"{"alice": {"name": "Alice", "password": "plaintext", "balance": 1}}"#;
        assert!(matches!(
            UserDirectory::from_json(json),
            Err(DirectoryError::InvalidHash(user)) if user == "alice"
        ));
    }

    #[test]
    fn from_json_rejects_empty_username() {
        let json = format!(r#"{{"": {{"name": "Nobody", "password": "{HASH}", "balance": 0}}}}"#);
        assert!(matches!(
            UserDirectory::from_json(&json),
            Err(DirectoryError::EmptyUsername)
        ));
    }

    #[test]
    fn from_json_rejects_missing_fields() {
        let json = r#"{"alice": {"name": "Alice"}}"#;
        assert!(matches!(
            UserDirectory::from_json(json),
            Err(DirectoryError::Json(_))
        ));
    }

    #[tokio::test]
    async fn load_reads_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(users_json().as_bytes())?;

        let directory = UserDirectory::load(file.path()).await?;
        assert_eq!(directory.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let result = UserDirectory::load(Path::new("/nonexistent/signet/users.json")).await;
        assert!(matches!(result, Err(DirectoryError::Read { .. })));
    }
}
