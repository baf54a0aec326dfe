mod hash;
mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

/// `--password-salt`, shared by the server and the `hash` subcommand.
pub(crate) fn password_salt_arg() -> Arg {
    Arg::new("password-salt")
        .long("password-salt")
        .help("Secret salt appended to passwords before hashing")
        .env("SIGNET_PASSWORD_SALT")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("signet")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_negates_reqs(true)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("SIGNET_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("users")
                .short('u')
                .long("users")
                .help("Path to the JSON user file")
                .long_help(
                    "Path to the JSON user file, keyed by username: {\"alice\": {\"name\": \"Alice\", \"password\": \"<sha256 hex>\", \"balance\": 100}}",
                )
                .env("SIGNET_USERS")
                .required(true),
        )
        .arg(
            Arg::new("secret-key")
                .long("secret-key")
                .help("HMAC key used to sign session cookies (random per process if unset)")
                .env("SIGNET_SECRET_KEY")
                .hide_env_values(true),
        )
        .arg(password_salt_arg())
        .arg(
            Arg::new("login-template")
                .long("login-template")
                .help("HTML file served as the login page instead of the built-in one")
                .env("SIGNET_LOGIN_TEMPLATE"),
        );

    let command = hash::with_subcommand(command);
    logging::with_args(command)
}
