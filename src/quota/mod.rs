//! Per-user quota and cooldown bookkeeping.
//!
//! The store only records state; deciding whether a request is allowed lives in
//! [`crate::issuer`].

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{UserQuotaStore, UserState};

/// Successful issuances allowed per user per local calendar date.
pub const MAX_CODES_PER_DAY: u32 = 2;

/// Minimum seconds between two successful issuances for the same user.
pub const COOLDOWN_SECONDS: f64 = 30.0;
