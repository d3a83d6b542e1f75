use super::relay_auth::RelayCredential;
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Interaction id the relay attaches to the "get code" button.
pub const GET_CODE_INTERACTION_ID: &str = "get_otp_code";

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetupButton {
    pub custom_id: String,
    pub label: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetupGuide {
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub button: SetupButton,
}

impl Default for SetupGuide {
    fn default() -> Self {
        Self {
            title: "Auto-Login Guide".to_string(),
            description: "Sign in with the shared account and confirm with a one-time code."
                .to_string(),
            steps: vec![
                "Download AdsPower Browser from https://www.adspower.com/".to_string(),
                "Login to AdsPower using the provided credentials".to_string(),
                "Click the button below to get your Authenticator Verification Code and enter it"
                    .to_string(),
            ],
            button: SetupButton {
                custom_id: GET_CODE_INTERACTION_ID.to_string(),
                label: "Click to Get Code!".to_string(),
            },
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/setup",
    responses (
        (status = 200, description = "Guide message posted by the `/setup` command", body = SetupGuide),
        (status = 401, description = "Missing or invalid relay credential"),
    ),
    security(("bearer" = [])),
    tag = "codes",
)]
pub async fn setup(
    headers: HeaderMap,
    Extension(credential): Extension<Arc<RelayCredential>>,
) -> impl IntoResponse {
    if let Err(response) = credential.authorize(&headers) {
        return response;
    }

    (StatusCode::OK, Json(SetupGuide::default())).into_response()
}
