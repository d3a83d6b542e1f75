use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_PLATFORM_TOKEN: &str = "platform-token";

/// Chat platform credential.
///
/// # Errors
/// Returns an error if the credential is missing or blank.
pub fn parse(matches: &ArgMatches) -> anyhow::Result<SecretString> {
    match matches.get_one::<String>(ARG_PLATFORM_TOKEN) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => anyhow::bail!("missing required argument: --{ARG_PLATFORM_TOKEN}"),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_PLATFORM_TOKEN)
            .long(ARG_PLATFORM_TOKEN)
            .help("Chat platform bot token; the relay must present it as a bearer token")
            .env("DISCORD_TOKEN")
            .hide_env_values(true)
            .required(true),
    )
}
