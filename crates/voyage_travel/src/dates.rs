//! Calendar helpers shared by the search and booking tools.

use chrono::{DateTime, Days, NaiveDate, Utc};

/// Source of "today". All travel dates are UTC calendar dates.
pub trait Clock: Send + Sync + 'static {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC on `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::default()).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses `YYYY-MM-DD`, or the literals `today` / `tomorrow` relative to `clock`.
#[must_use]
pub fn resolve_date(input: &str, clock: &dyn Clock) -> Option<NaiveDate> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("today") {
        Some(clock.today())
    } else if input.eq_ignore_ascii_case("tomorrow") {
        clock.today().checked_add_days(Days::new(1))
    } else {
        NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
    }

    #[test]
    fn relative_literals() {
        assert_eq!(
            resolve_date("today", &clock()),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(
            resolve_date("Tomorrow", &clock()),
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
    }

    #[test]
    fn iso_dates_and_garbage() {
        assert_eq!(
            resolve_date("2026-02-14", &clock()),
            NaiveDate::from_ymd_opt(2026, 2, 14)
        );
        assert_eq!(resolve_date("14/02/2026", &clock()), None);
        assert_eq!(resolve_date("next week", &clock()), None);
    }
}
