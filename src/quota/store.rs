use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Quota and cooldown state of a single user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserState {
    /// Time of the last successful issuance, 0 if none.
    pub last_request_epoch_seconds: f64,
    /// Codes issued on `last_reset_date`.
    pub daily_count: u32,
    /// Local date the counter applies to.
    pub last_reset_date: NaiveDate,
}

impl UserState {
    fn fresh(today: NaiveDate) -> Self {
        Self {
            last_request_epoch_seconds: 0.0,
            daily_count: 0,
            last_reset_date: today,
        }
    }
}

/// In-memory map from user identity to [`UserState`].
///
/// Entries are created on first sight and never removed. The store does no
/// validation; callers decide and then record.
#[derive(Debug, Default)]
pub struct UserQuotaStore {
    users: HashMap<String, UserState>,
}

impl UserQuotaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `user_id`, creating it with zero counters if absent.
    ///
    /// Rollover-on-read: when the stored date differs from `today` the daily counter
    /// is reset to 0 and the date moved to `today` before returning. This is the only
    /// place a day rollover happens.
    pub fn get_or_create(&mut self, user_id: &str, today: NaiveDate) -> UserState {
        let state = self
            .users
            .entry(user_id.to_string())
            .or_insert_with(|| UserState::fresh(today));

        if state.last_reset_date != today {
            debug!(
                "rollover for {user_id}: {} -> {today}, dropping count {}",
                state.last_reset_date, state.daily_count
            );
            state.daily_count = 0;
            state.last_reset_date = today;
        }

        *state
    }

    /// Records a successful issuance at `now`.
    ///
    /// Returns the updated state, or `None` (recording nothing) when `user_id` was
    /// never resolved through [`Self::get_or_create`].
    pub fn record_issuance(&mut self, user_id: &str, now: f64) -> Option<UserState> {
        let state = self.users.get_mut(user_id)?;
        state.last_request_epoch_seconds = now;
        state.daily_count += 1;
        Some(*state)
    }

    /// Snapshot of the stored state, without rollover.
    #[must_use]
    pub fn peek(&self, user_id: &str) -> Option<UserState> {
        self.users.get(user_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn creates_zeroed_state() {
        let mut store = UserQuotaStore::new();
        assert!(store.is_empty());

        let state = store.get_or_create("u1", day(1));
        assert_eq!(state.daily_count, 0);
        assert!(state.last_request_epoch_seconds.abs() < f64::EPSILON);
        assert_eq!(state.last_reset_date, day(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn record_issuance_updates_timestamp_and_count() {
        let mut store = UserQuotaStore::new();
        store.get_or_create("u1", day(1));

        let state = store.record_issuance("u1", 1000.0).unwrap();
        assert_eq!(state.daily_count, 1);
        assert!((state.last_request_epoch_seconds - 1000.0).abs() < f64::EPSILON);

        let state = store.record_issuance("u1", 1031.0).unwrap();
        assert_eq!(state.daily_count, 2);
    }

    #[test]
    fn record_issuance_ignores_unknown_user() {
        let mut store = UserQuotaStore::new();
        assert!(store.record_issuance("ghost", 1000.0).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn rollover_on_read_resets_count_only() {
        let mut store = UserQuotaStore::new();
        store.get_or_create("u1", day(1));
        store.record_issuance("u1", 1000.0);
        store.record_issuance("u1", 1031.0);

        let state = store.get_or_create("u1", day(2));
        assert_eq!(state.daily_count, 0);
        assert_eq!(state.last_reset_date, day(2));
        // the cooldown timestamp survives the rollover
        assert!((state.last_request_epoch_seconds - 1031.0).abs() < f64::EPSILON);
    }

    #[test]
    fn same_day_read_keeps_count() {
        let mut store = UserQuotaStore::new();
        store.get_or_create("u1", day(1));
        store.record_issuance("u1", 1000.0);

        assert_eq!(store.get_or_create("u1", day(1)).daily_count, 1);
        assert_eq!(store.peek("u1").unwrap().daily_count, 1);
    }

    #[test]
    fn peek_does_not_rollover() {
        let mut store = UserQuotaStore::new();
        store.get_or_create("u1", day(1));
        store.record_issuance("u1", 1000.0);

        let snapshot = store.peek("u1").unwrap();
        assert_eq!(snapshot.last_reset_date, day(1));
        assert!(store.peek("u2").is_none());
    }

    #[test]
    fn users_are_independent() {
        let mut store = UserQuotaStore::new();
        store.get_or_create("u1", day(1));
        store.get_or_create("u2", day(1));
        store.record_issuance("u1", 1000.0);

        assert_eq!(store.peek("u1").unwrap().daily_count, 1);
        assert_eq!(store.peek("u2").unwrap().daily_count, 0);
    }
}
