use crate::{
    api::{self, RelayCredential},
    cli::telemetry,
    issuer::{CodeGenerator, CodeIssuer},
    quota::{SystemClock, UserQuotaStore},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Args {
    pub port: u16,
    pub platform_token: SecretString,
    pub otp_secret: Option<SecretString>,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("platform_token", &"***")
            .field("otp_secret", &self.otp_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Build the issuer from the startup secret.
///
/// # Errors
/// Returns an error if a secret is given but is not valid base32.
pub fn build_issuer(otp_secret: Option<&SecretString>) -> Result<CodeIssuer> {
    let generator = otp_secret
        .map(CodeGenerator::from_base32)
        .transpose()
        .context("Invalid OTP_SECRET")?;

    if generator.is_none() {
        warn!("OTP_SECRET not set: code requests will be denied until it is configured");
    }

    Ok(CodeIssuer::new(
        UserQuotaStore::new(),
        generator,
        Arc::new(SystemClock),
    ))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the OTP secret is malformed or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        "Starting codegate on port {} (otp secret {})",
        args.port,
        if args.otp_secret.is_some() {
            "configured"
        } else {
            "missing"
        }
    );

    let issuer = Arc::new(build_issuer(args.otp_secret.as_ref())?);
    let credential = Arc::new(RelayCredential::new(args.platform_token));

    let result = api::new(args.port, issuer, credential).await;

    telemetry::shutdown_tracer();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_still_builds() {
        let issuer = build_issuer(None);
        assert!(issuer.is_ok_and(|issuer| !issuer.is_configured()));
    }

    #[test]
    fn valid_secret_configures_issuer() {
        let secret = SecretString::from("JBSWY3DPEHPK3PXP".to_string());
        let issuer = build_issuer(Some(&secret));
        assert!(issuer.is_ok_and(|issuer| issuer.is_configured()));
    }

    #[test]
    fn malformed_secret_is_fatal() {
        let secret = SecretString::from("not base32 at all!".to_string());
        let result = build_issuer(Some(&secret));
        assert!(result.is_err());
        if let Err(err) = result {
            assert!(err.to_string().contains("Invalid OTP_SECRET"));
        }
    }

    #[test]
    fn debug_hides_secrets() {
        let args = Args {
            port: 8080,
            platform_token: SecretString::from("bot-token".to_string()),
            otp_secret: Some(SecretString::from("JBSWY3DPEHPK3PXP".to_string())),
        };
        let rendered = format!("{args:?}");
        assert!(!rendered.contains("bot-token"));
        assert!(!rendered.contains("JBSWY3DPEHPK3PXP"));
    }
}
