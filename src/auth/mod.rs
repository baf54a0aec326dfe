//! Session authenticator: password checks plus signed session tokens.

pub mod config;
pub mod password;
pub mod token;
pub mod users;

pub use self::config::{generate_secret_key, AuthConfig};
pub use self::token::{TokenError, TokenSigner};
pub use self::users::{DirectoryError, UserDirectory, UserRecord};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

/// Same text for unknown users and wrong passwords.
pub const LOGIN_FAILED_MESSAGE: &str = "Unknown user or bad credentials";

#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
    /// Present only on success; the caller attaches it as the session cookie.
    pub token: Option<String>,
}

/// What the index page should show for a given session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Greeting {
    LoginForm,
    /// The cookie was present but rejected; the client must drop it.
    LoginFormClearCookie,
    Welcome { display_name: String },
}

#[derive(Debug)]
pub struct Authenticator {
    users: UserDirectory,
    signer: TokenSigner,
    password_salt: SecretString,
}

impl Authenticator {
    /// # Errors
    /// Returns an error if the secret key cannot be used as an HMAC key.
    pub fn new(config: &AuthConfig, users: UserDirectory) -> Result<Self, TokenError> {
        Ok(Self {
            users,
            signer: TokenSigner::new(config.secret_key())?,
            password_salt: config.password_salt().clone(),
        })
    }

    #[must_use]
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    #[must_use]
    pub fn verify_password(&self, plain: &str, stored_hash: &str) -> bool {
        password::verify_password(plain, stored_hash, self.password_salt.expose_secret())
    }

    #[must_use]
    pub fn sign(&self, username: &str) -> String {
        self.signer.sign(username)
    }

    #[must_use]
    pub fn issue_token(&self, username: &str) -> String {
        self.signer.issue(username)
    }

    /// Resolve a token to its username; `None` means "treat as anonymous".
    #[must_use]
    pub fn validate_token(&self, token: &str) -> Option<String> {
        match self.signer.validate(token) {
            Ok(username) => Some(username),
            Err(err) => {
                debug!("Rejected session token: {err}");
                None
            }
        }
    }

    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> LoginOutcome {
        let Some(user) = self
            .users
            .get(username)
            .filter(|user| self.verify_password(password, &user.password_hash))
        else {
            debug!("Login failed");
            return LoginOutcome {
                success: false,
                message: LOGIN_FAILED_MESSAGE.to_string(),
                token: None,
            };
        };

        debug!("Login succeeded");
        LoginOutcome {
            success: true,
            message: format!(
                "Hello, {}. <br />Your balance: {}",
                user.display_name, user.balance
            ),
            token: Some(self.issue_token(username)),
        }
    }

    #[instrument(skip_all)]
    pub fn greet(&self, token: Option<&str>) -> Greeting {
        let Some(token) = token else {
            return Greeting::LoginForm;
        };

        // A signed token for a user no longer in the directory is dropped as well.
        match self
            .validate_token(token)
            .and_then(|username| self.users.get(&username))
        {
            Some(user) => Greeting::Welcome {
                display_name: user.display_name.clone(),
            },
            None => Greeting::LoginFormClearCookie,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const SALT: &str = "S";

    fn authenticator() -> Result<Authenticator> {
        let users = UserDirectory::new([
            UserRecord {
                username: "alice".to_string(),
                password_hash: password::hash_password("secret1", SALT),
                display_name: "Alice".to_string(),
                balance: 100_000.0,
            },
            UserRecord {
                username: "bob".to_string(),
                password_hash: password::hash_password("hunter2", SALT).to_uppercase(),
                display_name: "Bob".to_string(),
                balance: 555.5,
            },
        ])?;
        let config = AuthConfig::new(
            SecretString::from("test-secret-key"),
            SecretString::from(SALT),
        );
        Ok(Authenticator::new(&config, users)?)
    }

    #[test]
    fn login_succeeds_with_correct_password() -> Result<()> {
        let auth = authenticator()?;
        let outcome = auth.login("alice", "secret1");
        assert!(outcome.success);
        assert_eq!(outcome.message, "Hello, Alice. <br />Your balance: 100000");
        assert_eq!(outcome.token, Some(auth.issue_token("alice")));
        Ok(())
    }

    #[test]
    fn login_accepts_uppercase_stored_hash() -> Result<()> {
        let outcome = authenticator()?.login("bob", "hunter2");
        assert!(outcome.success);
        assert_eq!(outcome.message, "Hello, Bob. <br />Your balance: 555.5");
        Ok(())
    }

    #[test]
    fn login_failures_are_indistinguishable() -> Result<()> {
        let auth = authenticator()?;
        let wrong_password = auth.login("alice", "wrong");
        let unknown_user = auth.login("mallory", "secret1");
        let wrong_case = auth.login("alice", "SECRET1");

        for outcome in [&wrong_password, &unknown_user, &wrong_case] {
            assert!(!outcome.success);
            assert_eq!(outcome.message, LOGIN_FAILED_MESSAGE);
            assert!(outcome.token.is_none());
        }
        assert_eq!(wrong_password, unknown_user);
        Ok(())
    }

    #[test]
    fn validate_token_round_trips() -> Result<()> {
        let auth = authenticator()?;
        let token = auth.issue_token("alice");
        assert_eq!(auth.validate_token(&token).as_deref(), Some("alice"));
        assert_eq!(auth.validate_token("no-separator"), None);
        Ok(())
    }

    #[test]
    fn greet_without_token_shows_login_form() -> Result<()> {
        assert_eq!(authenticator()?.greet(None), Greeting::LoginForm);
        Ok(())
    }

    #[test]
    fn greet_with_valid_token_welcomes_user() -> Result<()> {
        let auth = authenticator()?;
        let token = auth.issue_token("alice");
        assert_eq!(
            auth.greet(Some(&token)),
            Greeting::Welcome {
                display_name: "Alice".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn greet_with_bad_signature_clears_cookie() -> Result<()> {
        let auth = authenticator()?;
        assert_eq!(
            auth.greet(Some("YWxpY2U=.DEADBEEF")),
            Greeting::LoginFormClearCookie
        );
        assert_eq!(auth.greet(Some("garbage")), Greeting::LoginFormClearCookie);
        Ok(())
    }

    #[test]
    fn greet_with_unknown_user_clears_cookie() -> Result<()> {
        let auth = authenticator()?;
        let token = auth.issue_token("carol");
        assert_eq!(auth.greet(Some(&token)), Greeting::LoginFormClearCookie);
        Ok(())
    }
}
