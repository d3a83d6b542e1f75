//! User-facing texts the relay shows next to the structured fields.

use crate::issuer::{Denial, DenialReason, IssuedCode, UsageStatus};
use crate::quota::MAX_CODES_PER_DAY;

#[must_use]
pub fn issued(issued: &IssuedCode) -> String {
    format!(
        "Your code: {}\nExpires in {} seconds\nDaily usage: {}/{}\nThis code is valid for 30 seconds only",
        issued.code, issued.remaining_seconds, issued.daily_count, issued.limit
    )
}

#[must_use]
pub fn denied(denial: &Denial) -> String {
    match denial.reason {
        DenialReason::DailyLimitExceeded => format!(
            "Daily limit exceeded! You can only request {MAX_CODES_PER_DAY} codes per day. Try again tomorrow."
        ),
        DenialReason::Cooldown => format!(
            "Please wait! You must wait {} seconds before requesting a new code.",
            denial.retry_after_seconds.unwrap_or_default()
        ),
        DenialReason::Misconfigured => "Configuration error: OTP secret not found".to_string(),
    }
}

#[must_use]
pub fn status(status: &UsageStatus) -> String {
    let cooldown = if status.cooldown_remaining > 0 {
        format!("{} seconds", status.cooldown_remaining)
    } else {
        "Ready to use".to_string()
    };

    format!(
        "Daily usage: {}/{}\nCooldown remaining: {cooldown}",
        status.daily_count, status.limit
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_mentions_code_and_usage() {
        let text = issued(&IssuedCode {
            code: "654321".to_string(),
            remaining_seconds: 12,
            daily_count: 1,
            limit: 2,
        });
        assert!(text.contains("654321"));
        assert!(text.contains("Expires in 12 seconds"));
        assert!(text.contains("1/2"));
    }

    #[test]
    fn denial_texts() {
        assert!(denied(&Denial::daily_limit()).contains("2 codes per day"));
        assert!(denied(&Denial::cooldown(17)).contains("wait 17 seconds"));
        assert_eq!(
            denied(&Denial::misconfigured()),
            "Configuration error: OTP secret not found"
        );
    }

    #[test]
    fn status_ready_or_waiting() {
        let ready = status(&UsageStatus {
            daily_count: 0,
            limit: 2,
            cooldown_remaining: 0,
        });
        assert!(ready.contains("0/2"));
        assert!(ready.contains("Ready to use"));

        let waiting = status(&UsageStatus {
            daily_count: 1,
            limit: 2,
            cooldown_remaining: 9,
        });
        assert!(waiting.contains("9 seconds"));
    }
}
