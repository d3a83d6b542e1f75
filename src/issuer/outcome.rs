use serde::Serialize;
use utoipa::ToSchema;

/// Why a code request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    DailyLimitExceeded,
    Cooldown,
    /// No shared secret configured. Operator fault, not throttling.
    Misconfigured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IssuedCode {
    pub code: String,
    pub remaining_seconds: u64,
    pub daily_count: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Denial {
    pub reason: DenialReason,
    /// Only set for `Cooldown`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl Denial {
    #[must_use]
    pub const fn daily_limit() -> Self {
        Self {
            reason: DenialReason::DailyLimitExceeded,
            retry_after_seconds: None,
        }
    }

    #[must_use]
    pub const fn cooldown(retry_after_seconds: u64) -> Self {
        Self {
            reason: DenialReason::Cooldown,
            retry_after_seconds: Some(retry_after_seconds),
        }
    }

    #[must_use]
    pub const fn misconfigured() -> Self {
        Self {
            reason: DenialReason::Misconfigured,
            retry_after_seconds: None,
        }
    }
}

/// Result of a code request. Denials are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IssueOutcome {
    Issued(IssuedCode),
    Denied(Denial),
}

impl IssueOutcome {
    #[must_use]
    pub const fn is_issued(&self) -> bool {
        matches!(self, Self::Issued(_))
    }
}

/// Read-only usage report for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageStatus {
    pub daily_count: u32,
    pub limit: u32,
    pub cooldown_remaining: u64,
}
