use crate::issuer::{
    outcome::{Denial, IssueOutcome, IssuedCode, UsageStatus},
    totp::{self, CodeGenerator},
};
use crate::quota::{Clock, UserQuotaStore, UserState, COOLDOWN_SECONDS, MAX_CODES_PER_DAY};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, instrument};

/// Decides code requests against the quota store and issues codes.
///
/// The store sits behind a single lock; every decision (resolve, check, generate,
/// commit) runs in one critical section so concurrent requests for the same user
/// cannot both pass the same check.
pub struct CodeIssuer {
    store: Mutex<UserQuotaStore>,
    generator: Option<CodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl CodeIssuer {
    /// `generator` is `None` when no shared secret is configured; requests are then
    /// denied as misconfigured while status queries keep working.
    #[must_use]
    pub fn new(
        store: UserQuotaStore,
        generator: Option<CodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            generator,
            clock,
        }
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Handles a code request from `user_id` at `now` (epoch seconds).
    pub fn request_code(&self, user_id: &str, now: f64) -> IssueOutcome {
        let mut store = self.store();
        self.decide(&mut store, user_id, now)
    }

    /// [`Self::request_code`] at the clock's current time.
    pub fn request_code_now(&self, user_id: &str) -> IssueOutcome {
        let mut store = self.store();
        // read under the lock so decisions are taken in timestamp order
        let now = self.clock.now();
        self.decide(&mut store, user_id, now)
    }

    /// Usage report for `user_id` at `now`.
    ///
    /// Resolves the user through the same rollover-on-read accessor as issuance, so a
    /// status query on a new date does reset the daily counter. Nothing else is
    /// written.
    pub fn status(&self, user_id: &str, now: f64) -> UsageStatus {
        let mut store = self.store();
        self.report(&mut store, user_id, now)
    }

    pub fn status_now(&self, user_id: &str) -> UsageStatus {
        let mut store = self.store();
        let now = self.clock.now();
        self.report(&mut store, user_id, now)
    }

    /// Stored state without rollover, `None` for users never seen.
    #[must_use]
    pub fn peek(&self, user_id: &str) -> Option<UserState> {
        self.store().peek(user_id)
    }

    // Transitions never leave the map half-updated, so a poisoned lock is still usable.
    fn store(&self) -> MutexGuard<'_, UserQuotaStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[instrument(skip(self, store))]
    fn decide(&self, store: &mut UserQuotaStore, user_id: &str, now: f64) -> IssueOutcome {
        let state = store.get_or_create(user_id, self.clock.today(now));

        if state.daily_count >= MAX_CODES_PER_DAY {
            debug!("daily limit reached ({}/{MAX_CODES_PER_DAY})", state.daily_count);
            return IssueOutcome::Denied(Denial::daily_limit());
        }

        let elapsed = now - state.last_request_epoch_seconds;
        if elapsed < COOLDOWN_SECONDS {
            let retry_after = ceil_seconds(COOLDOWN_SECONDS - elapsed);
            debug!("cooldown active, retry after {retry_after}s");
            return IssueOutcome::Denied(Denial::cooldown(retry_after));
        }

        let Some(generator) = &self.generator else {
            error!("OTP secret not configured, cannot issue code");
            return IssueOutcome::Denied(Denial::misconfigured());
        };

        let code = generator.generate(now);
        let remaining_seconds = totp::remaining_seconds(now);

        let daily_count = store
            .record_issuance(user_id, now)
            .map_or(state.daily_count + 1, |updated| updated.daily_count);

        info!(daily_count, remaining_seconds, "code issued");

        IssueOutcome::Issued(IssuedCode {
            code,
            remaining_seconds,
            daily_count,
            limit: MAX_CODES_PER_DAY,
        })
    }

    #[instrument(skip(self, store))]
    fn report(&self, store: &mut UserQuotaStore, user_id: &str, now: f64) -> UsageStatus {
        let state = store.get_or_create(user_id, self.clock.today(now));

        let cooldown_remaining =
            ceil_seconds(COOLDOWN_SECONDS - (now - state.last_request_epoch_seconds));

        UsageStatus {
            daily_count: state.daily_count,
            limit: MAX_CODES_PER_DAY,
            cooldown_remaining,
        }
    }
}

impl std::fmt::Debug for CodeIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeIssuer")
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}

/// Whole seconds needed to cover `gap`, never negative.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_seconds(gap: f64) -> u64 {
    gap.ceil().max(0.0) as u64
}
