use super::{messages, relay_auth::RelayCredential};
use crate::issuer::{CodeIssuer, DenialReason, IssueOutcome};
use axum::{
    extract::Extension,
    http::{header::RETRY_AFTER, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CodeRequest {
    /// Chat platform user id of the member who clicked the button.
    pub user_id: String,
}

/// Outcome fields (`outcome`, then the issued code or the denial reason) plus the
/// text the relay shows the member.
#[derive(ToSchema, Serialize, Debug)]
pub struct CodeResponse {
    #[serde(flatten)]
    pub outcome: IssueOutcome,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/v1/codes",
    request_body = CodeRequest,
    responses (
        (status = 200, description = "Code issued", body = CodeResponse),
        (status = 400, description = "Missing user id"),
        (status = 401, description = "Missing or invalid relay credential"),
        (status = 429, description = "Cooldown active or daily limit reached", body = CodeResponse),
        (status = 503, description = "OTP secret not configured", body = CodeResponse),
    ),
    security(("bearer" = [])),
    tag = "codes",
)]
// axum handler for the "get code" button
#[instrument(skip_all)]
pub async fn request_code(
    headers: HeaderMap,
    Extension(issuer): Extension<Arc<CodeIssuer>>,
    Extension(credential): Extension<Arc<RelayCredential>>,
    Json(request): Json<CodeRequest>,
) -> impl IntoResponse {
    if let Err(response) = credential.authorize(&headers) {
        return response;
    }

    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "user_id is required"})),
        )
            .into_response();
    }

    let outcome = issuer.request_code_now(user_id);

    let (status, retry_after, message) = match &outcome {
        IssueOutcome::Issued(issued) => (StatusCode::OK, None, messages::issued(issued)),
        IssueOutcome::Denied(denial) => {
            let status = if denial.reason == DenialReason::Misconfigured {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::TOO_MANY_REQUESTS
            };
            (status, denial.retry_after_seconds, messages::denied(denial))
        }
    };

    let body = Json(CodeResponse { outcome, message });

    match retry_after {
        Some(seconds) => (status, [(RETRY_AFTER, seconds.to_string())], body).into_response(),
        None => (status, body).into_response(),
    }
}
