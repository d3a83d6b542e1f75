use super::{messages, relay_auth::RelayCredential};
use crate::issuer::CodeIssuer;
use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub daily_count: u32,
    pub limit: u32,
    /// Seconds until the next code can be requested, 0 when ready.
    pub cooldown_remaining: u64,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/status",
    params(
        ("user_id" = String, Path, description = "Chat platform user id")
    ),
    responses (
        (status = 200, description = "Usage of the daily quota and cooldown", body = StatusResponse),
        (status = 400, description = "Missing user id"),
        (status = 401, description = "Missing or invalid relay credential"),
    ),
    security(("bearer" = [])),
    tag = "codes",
)]
// axum handler for the `/status` command
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn status(
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Extension(issuer): Extension<Arc<CodeIssuer>>,
    Extension(credential): Extension<Arc<RelayCredential>>,
) -> impl IntoResponse {
    if let Err(response) = credential.authorize(&headers) {
        return response;
    }

    let user_id = user_id.trim();
    if user_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "user_id is required"})),
        )
            .into_response();
    }

    let usage = issuer.status_now(user_id);

    let body = StatusResponse {
        daily_count: usage.daily_count,
        limit: usage.limit,
        cooldown_remaining: usage.cooldown_remaining,
        message: messages::status(&usage),
    };

    (StatusCode::OK, Json(body)).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::quota::{ManualClock, UserQuotaStore};
    use anyhow::Result;
    use axum::{
        body::to_bytes,
        http::{header::AUTHORIZATION, HeaderValue},
    };
    use secrecy::SecretString;

    fn credential() -> Arc<RelayCredential> {
        Arc::new(RelayCredential::new(SecretString::from(
            "relay-token".to_string(),
        )))
    }

    fn auth_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer relay-token"));
        headers
    }

    #[tokio::test]
    async fn reports_usage_without_secret() -> Result<()> {
        let clock = Arc::new(ManualClock::new(1000.0));
        let issuer = Arc::new(CodeIssuer::new(UserQuotaStore::new(), None, clock));

        let response = status(
            auth_headers(),
            Path("U1".to_string()),
            Extension(issuer),
            Extension(credential()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body: StatusResponse = serde_json::from_slice(&body)?;
        assert_eq!(body.daily_count, 0);
        assert_eq!(body.limit, 2);
        assert_eq!(body.cooldown_remaining, 0);
        assert!(body.message.contains("Ready to use"));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unauthenticated_relay() {
        let clock = Arc::new(ManualClock::new(1000.0));
        let issuer = Arc::new(CodeIssuer::new(UserQuotaStore::new(), None, clock));

        let response = status(
            HeaderMap::new(),
            Path("U1".to_string()),
            Extension(issuer.clone()),
            Extension(credential()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(issuer.peek("U1").is_none());
    }

    #[tokio::test]
    async fn rejects_blank_user_id_without_creating_state() {
        let clock = Arc::new(ManualClock::new(1000.0));
        let issuer = Arc::new(CodeIssuer::new(UserQuotaStore::new(), None, clock));

        let response = status(
            auth_headers(),
            Path(" ".to_string()),
            Extension(issuer.clone()),
            Extension(credential()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(issuer.peek(" ").is_none());
        assert!(issuer.peek("").is_none());
    }
}
