//! Authentication of the chat relay calling `/v1` routes.
//!
//! The relay presents the platform credential it logs in with as a bearer token.

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use constant_time_eq::constant_time_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::warn;

#[derive(Clone)]
pub struct RelayCredential {
    token: SecretString,
}

impl RelayCredential {
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Checks the `Authorization: Bearer <token>` header.
    #[must_use]
    pub fn verify(&self, headers: &HeaderMap) -> bool {
        let Some(presented) = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return false;
        };

        constant_time_eq(presented.trim().as_bytes(), self.token.expose_secret().as_bytes())
    }

    /// `Ok` when the caller is the relay, otherwise the 401 response to return.
    ///
    /// # Errors
    /// Returns an `UNAUTHORIZED` response if the header is missing or wrong.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        if self.verify(headers) {
            Ok(())
        } else {
            warn!("rejected relay request with missing or invalid credential");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "unauthorized"})),
            )
                .into_response())
        }
    }
}

impl std::fmt::Debug for RelayCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayCredential")
            .field("token", &"***")
            .finish()
    }
}
