use clap::{Arg, Command};

pub fn with_subcommand(command: Command) -> Command {
    command.subcommand(
        Command::new("hash")
            .about("Print SHA256(password + salt) for the user file")
            .arg(
                Arg::new("password")
                    .help("Plaintext password to hash")
                    .required(true),
            )
            .arg(super::password_salt_arg()),
    )
}
