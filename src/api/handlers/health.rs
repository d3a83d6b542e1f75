use crate::{issuer::CodeIssuer, GIT_COMMIT_HASH};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    otp_secret: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Service is up; `otp_secret` tells whether codes can be issued", body = Health),
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(
    method: Method,
    Extension(issuer): Extension<Arc<CodeIssuer>>,
) -> impl IntoResponse {
    let configured = issuer.is_configured();
    if !configured {
        warn!("OTP secret missing, code requests will be denied");
    }

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        otp_secret: if configured {
            "configured".to_string()
        } else {
            "missing".to_string()
        },
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    // a missing secret only degrades issuance, the service itself is up
    (StatusCode::OK, headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::CodeGenerator;
    use crate::quota::{ManualClock, UserQuotaStore};
    use anyhow::{Context, Result};
    use axum::body::to_bytes;
    use secrecy::SecretString;
    use serde_json::Value;

    fn issuer(secret: Option<&str>) -> Result<Arc<CodeIssuer>> {
        let generator = secret
            .map(|s| CodeGenerator::from_base32(&SecretString::from(s.to_string())))
            .transpose()?;
        Ok(Arc::new(CodeIssuer::new(
            UserQuotaStore::new(),
            generator,
            Arc::new(ManualClock::new(0.0)),
        )))
    }

    #[tokio::test]
    async fn reports_configured_secret() -> Result<()> {
        let response = health(Method::GET, Extension(issuer(Some("JBSWY3DPEHPK3PXP"))?))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-App"));

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body: Value = serde_json::from_slice(&body)?;
        assert_eq!(body["otp_secret"], "configured");
        assert_eq!(
            body["name"].as_str().context("name missing")?,
            env!("CARGO_PKG_NAME")
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_secret_is_still_healthy() -> Result<()> {
        let response = health(Method::GET, Extension(issuer(None)?))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body: Value = serde_json::from_slice(&body)?;
        assert_eq!(body["otp_secret"], "missing");
        Ok(())
    }

    #[tokio::test]
    async fn options_has_empty_body() -> Result<()> {
        let response = health(Method::OPTIONS, Extension(issuer(None)?))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(body.is_empty());
        Ok(())
    }
}
