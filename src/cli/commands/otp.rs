use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_OTP_SECRET: &str = "otp-secret";

/// Shared TOTP secret, if configured. Empty values count as missing.
#[must_use]
pub fn parse(matches: &ArgMatches) -> Option<SecretString> {
    matches
        .get_one::<String>(ARG_OTP_SECRET)
        .filter(|value| !value.trim().is_empty())
        .map(|value| SecretString::from(value.clone()))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_OTP_SECRET)
            .long(ARG_OTP_SECRET)
            .help("Base32 shared secret for the one-time codes")
            .long_help(
                "Base32 shared secret for the one-time codes, as entered in the authenticator app.\n\nWithout it the server still starts and answers status queries, but every code request is denied as misconfigured.",
            )
            .env("OTP_SECRET")
            .hide_env_values(true),
    )
}
