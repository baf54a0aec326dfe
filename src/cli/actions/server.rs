use crate::{
    api::{self, AppState},
    auth::{generate_secret_key, AuthConfig, Authenticator, UserDirectory},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub users: PathBuf,
    pub secret_key: Option<SecretString>,
    pub password_salt: SecretString,
    pub login_template: Option<PathBuf>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the user file or template cannot be loaded, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let users = UserDirectory::load(&args.users)
        .await
        .with_context(|| format!("Could not load users from {}", args.users.display()))?;

    info!("Loaded {} user(s)", users.len());

    let secret_key = if let Some(key) = args.secret_key {
        key
    } else {
        warn!("No secret key configured, generated an ephemeral one; sessions will not survive a restart");
        generate_secret_key()?
    };

    let login_page = match &args.login_template {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Could not read login template {}", path.display()))?,
        ),
        None => None,
    };

    let config = AuthConfig::new(secret_key, args.password_salt);
    debug!("Auth config: {:?}", config);

    let auth = Authenticator::new(&config, users).context("Could not initialize authenticator")?;

    api::new(args.port, AppState::new(auth, login_page)).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("users", args.users.display().to_string()),
        ("secret_key_set", args.secret_key.is_some().to_string()),
        ("password_salt_set", "true".to_string()),
        (
            "login_template",
            args.login_template
                .as_ref()
                .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        ),
    ];
    info!("{}", startup_message("Startup configuration", &entries));
}

fn startup_message(title: &str, entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", signet_banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    message
}

fn signet_banner() -> String {
    let short_hash = short_commit(crate::GIT_COMMIT_HASH);
    SIGNET_BANNER.replace(
        "{VERSION}",
        &format!(" - {} - {}", env!("CARGO_PKG_VERSION"), short_hash),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const SIGNET_BANNER: &str = r"
   .-----.
  / .---. \
 | |  S  | |
  \ '---' /
   '-----'   S I G N E T {VERSION}";
