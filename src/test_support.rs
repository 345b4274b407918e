//! Helpers shared by unit tests.

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockall::mock;
use std::sync::Mutex;

mock! {
    pub Clock {}

    impl mockable::Clock for Clock {
        fn local(&self) -> DateTime<Local>;
        fn utc(&self) -> DateTime<Utc>;
    }
}

/// Parses an RFC 3339 instant.
pub(crate) fn instant(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// Clock frozen at `at`.
pub(crate) fn fixed_clock(at: DateTime<Utc>) -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(at);
    clock.expect_local().return_const(at.with_timezone(&Local));
    clock
}

/// Clock returning `start`, then advancing by `step` on every reading.
pub(crate) fn stepping_clock(start: DateTime<Utc>, step: TimeDelta) -> MockClock {
    let next = Mutex::new(start);
    let mut clock = MockClock::new();
    clock.expect_utc().returning(move || {
        let mut current = next.lock().expect("clock lock");
        let reading = *current;
        *current = reading + step;
        reading
    });
    clock.expect_local().returning(|| Local::now());
    clock
}
