//! Time-stepped one-time codes (RFC 6238, HMAC-SHA1, 6 digits, 30 second step).

use secrecy::{ExposeSecret, SecretString};
use totp_rs::{Algorithm, Secret, TOTP};

pub const CODE_DIGITS: usize = 6;
pub const STEP_SECONDS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    #[error("OTP secret is empty")]
    Empty,
    #[error("OTP secret is not valid base32")]
    InvalidBase32,
}

/// Generates the code authenticator apps show for the shared secret.
pub struct CodeGenerator {
    totp: TOTP,
}

impl CodeGenerator {
    /// Builds a generator from a base32 secret as authenticator apps accept it:
    /// case-insensitive, with optional spaces, dashes and `=` padding.
    ///
    /// # Errors
    /// Returns `SecretError` if the secret is empty or does not decode as base32.
    pub fn from_base32(secret: &SecretString) -> Result<Self, SecretError> {
        let normalized: String = secret
            .expose_secret()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '=')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            return Err(SecretError::Empty);
        }

        let bytes = Secret::Encoded(normalized)
            .to_bytes()
            .map_err(|_| SecretError::InvalidBase32)?;

        if bytes.is_empty() {
            return Err(SecretError::InvalidBase32);
        }

        Ok(Self {
            totp: TOTP::new_unchecked(Algorithm::SHA1, CODE_DIGITS, 1, STEP_SECONDS, bytes),
        })
    }

    /// Code for the time step containing `now`.
    #[must_use]
    pub fn generate(&self, now: f64) -> String {
        self.totp.generate(whole_seconds(now))
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field("digits", &CODE_DIGITS)
            .field("step", &STEP_SECONDS)
            .field("secret", &"***")
            .finish()
    }
}

/// Seconds until the code valid at `now` is replaced. Always in `1..=30`; exactly on a
/// step boundary a fresh code has the whole step ahead of it.
#[must_use]
pub fn remaining_seconds(now: f64) -> u64 {
    STEP_SECONDS - whole_seconds(now) % STEP_SECONDS
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(now: f64) -> u64 {
    now.floor().max(0.0) as u64
}
