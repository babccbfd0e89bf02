//! Coarse "3 hours from now" / "5 minutes ago" rendering for game announcements.

use time::OffsetDateTime;

const SECOND: u64 = 1;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 12 * MONTH;
const LONG_TIME: u64 = 37 * YEAR;

/// Upper bound (exclusive, seconds) and how to phrase spans below it.
enum Phrase {
    Fixed(&'static str),
    Count { unit: u64, plural: &'static str },
}

const MAGNITUDES: &[(u64, Phrase)] = &[
    (2 * SECOND, Phrase::Fixed("1 second")),
    (MINUTE, Phrase::Count { unit: SECOND, plural: "seconds" }),
    (2 * MINUTE, Phrase::Fixed("1 minute")),
    (HOUR, Phrase::Count { unit: MINUTE, plural: "minutes" }),
    (2 * HOUR, Phrase::Fixed("1 hour")),
    (DAY, Phrase::Count { unit: HOUR, plural: "hours" }),
    (2 * DAY, Phrase::Fixed("1 day")),
    (WEEK, Phrase::Count { unit: DAY, plural: "days" }),
    (2 * WEEK, Phrase::Fixed("1 week")),
    (MONTH, Phrase::Count { unit: WEEK, plural: "weeks" }),
    (2 * MONTH, Phrase::Fixed("1 month")),
    (YEAR, Phrase::Count { unit: MONTH, plural: "months" }),
    (18 * MONTH, Phrase::Fixed("1 year")),
    (2 * YEAR, Phrase::Fixed("2 years")),
    (LONG_TIME, Phrase::Count { unit: YEAR, plural: "years" }),
];

/// Describe `target` relative to `now`, e.g. `"10 minutes from now"` or `"2 days ago"`.
pub fn relative_time(target: OffsetDateTime, now: OffsetDateTime) -> String {
    let (span, label) = if target > now {
        (target - now, "from now")
    } else {
        (now - target, "ago")
    };
    let seconds = span.whole_seconds().unsigned_abs();

    if seconds < SECOND {
        return "now".into();
    }

    for (limit, phrase) in MAGNITUDES {
        if seconds < *limit {
            return match phrase {
                Phrase::Fixed(text) => format!("{text} {label}"),
                Phrase::Count { unit, plural } => format!("{} {plural} {label}", seconds / unit),
            };
        }
    }

    format!("a long while {label}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, macros::datetime};

    const NOW: OffsetDateTime = datetime!(2024-05-01 12:00 UTC);

    fn from_now(offset: Duration) -> String {
        relative_time(NOW + offset, NOW)
    }

    #[test]
    fn near_instants_are_now() {
        assert_eq!(from_now(Duration::ZERO), "now");
        assert_eq!(from_now(Duration::milliseconds(900)), "now");
    }

    #[test]
    fn future_spans() {
        assert_eq!(from_now(Duration::seconds(1)), "1 second from now");
        assert_eq!(from_now(Duration::seconds(45)), "45 seconds from now");
        assert_eq!(from_now(Duration::seconds(90)), "1 minute from now");
        assert_eq!(from_now(Duration::minutes(10)), "10 minutes from now");
        assert_eq!(from_now(Duration::minutes(30)), "30 minutes from now");
        assert_eq!(from_now(Duration::hours(3)), "3 hours from now");
        assert_eq!(from_now(Duration::days(3)), "3 days from now");
        assert_eq!(from_now(Duration::days(20)), "2 weeks from now");
        assert_eq!(from_now(Duration::days(400)), "1 year from now");
    }

    #[test]
    fn past_spans() {
        assert_eq!(from_now(Duration::minutes(-30)), "30 minutes ago");
        assert_eq!(from_now(Duration::hours(-1)), "1 hour ago");
        assert_eq!(from_now(Duration::days(-90)), "3 months ago");
    }

    #[test]
    fn very_long_spans() {
        assert_eq!(from_now(Duration::days(365 * 10)), "10 years from now");
        assert_eq!(from_now(Duration::days(365 * 40)), "a long while from now");
    }
}
