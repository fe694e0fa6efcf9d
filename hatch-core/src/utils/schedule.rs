use chrono::{DateTime, Duration, Offset, TimeZone, Utc};
use chrono_tz::Tz;

const HOUR_SECS: i64 = 3600;

/// Returns the first local top-of-hour in `tz` strictly after `after`.
///
/// Works on the UTC offset in effect at `after`, so zones with a non-whole-hour
/// offset (e.g. `Asia/Kolkata`, UTC+05:30) fire at their own :00.
pub fn next_report_at(after: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let offset = tz
        .offset_from_utc_datetime(&after.naive_utc())
        .fix()
        .local_minus_utc();
    let offset = i64::from(offset);
    let local_secs = after.timestamp() + offset;
    let into_hour = local_secs.rem_euclid(HOUR_SECS);
    let truncated = after
        - Duration::seconds(into_hour)
        - Duration::nanoseconds(i64::from(after.timestamp_subsec_nanos()));
    truncated + Duration::seconds(HOUR_SECS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_whole_hour_zone() {
        let next = next_report_at(utc("2026-01-15T14:25:10.5Z"), chrono_tz::America::New_York);
        assert_eq!(next, utc("2026-01-15T15:00:00Z"));
    }

    #[test]
    fn test_exact_boundary_moves_to_next_hour() {
        let next = next_report_at(utc("2026-01-15T15:00:00Z"), chrono_tz::UTC);
        assert_eq!(next, utc("2026-01-15T16:00:00Z"));
    }

    #[test]
    fn test_half_hour_offset_zone() {
        // 14:25Z is 19:55 in Kolkata; the next local :00 is 20:00 = 14:30Z.
        let next = next_report_at(utc("2026-01-15T14:25:00Z"), chrono_tz::Asia::Kolkata);
        assert_eq!(next, utc("2026-01-15T14:30:00Z"));
    }
}
