use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source for quota decisions.
///
/// `now` is expressed in fractional epoch seconds. `today` maps a timestamp to the
/// calendar date the daily counter is keyed on.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
    fn today(&self, now: f64) -> NaiveDate;
}

/// Wall clock, dates in the host's local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64())
    }

    fn today(&self, now: f64) -> NaiveDate {
        date_in(&Local, now)
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<f64>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Clock starting at `now`, with dates computed in UTC.
    #[must_use]
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
            offset: Utc.fix(),
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn set(&self, now: f64) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, seconds: f64) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn today(&self, now: f64) -> NaiveDate {
        date_in(&self.offset, now)
    }
}

/// Calendar date of an epoch timestamp in `tz`.
///
/// Timestamps chrono cannot represent collapse to the epoch date.
#[allow(clippy::cast_possible_truncation)]
pub fn date_in<Tz: TimeZone>(tz: &Tz, now: f64) -> NaiveDate {
    let secs = now.floor() as i64;
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .with_timezone(tz)
        .date_naive()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn date_in_utc() {
        // 2024-03-10T23:59:59Z
        let date = date_in(&Utc, 1_710_115_199.5);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        let date = date_in(&Utc, 1_710_115_200.0);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn date_in_respects_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        // 2024-03-10T23:00:00Z is already the 11th at +02:00
        let date = date_in(&plus_two, 1_710_111_600.0);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(1000.0);
        assert!((clock.now() - 1000.0).abs() < f64::EPSILON);

        clock.advance(31.0);
        assert!((clock.now() - 1031.0).abs() < f64::EPSILON);

        clock.set(86_400.0);
        assert_eq!(
            clock.today(clock.now()),
            NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()
        );
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now() > 0.0);
    }
}
