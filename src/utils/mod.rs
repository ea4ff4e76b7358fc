use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub mod logging;

/// Parses the `start` value stored on calendar sources.
///
/// Accepts RFC 3339 timestamps, bare dates (midnight UTC) and naive
/// date-times, which are read in the office time zone.
pub fn parse_event_start(value: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    None
}

/// Formats a UTC instant the way the calendar API expects (`...T10:00:00.000Z`).
pub fn to_api_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_event_start("2025-01-10T10:00:00+05:30", chrono_tz::UTC).unwrap();
        assert_eq!(to_api_timestamp(parsed), "2025-01-10T04:30:00.000Z");
    }

    #[test]
    fn test_parse_bare_date_is_utc_midnight() {
        let parsed = parse_event_start("2025-01-10", chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(to_api_timestamp(parsed), "2025-01-10T00:00:00.000Z");
    }

    #[test]
    fn test_parse_naive_uses_office_zone() {
        let parsed = parse_event_start("2025-01-10T10:00", chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(to_api_timestamp(parsed), "2025-01-10T04:30:00.000Z");
    }

    #[test]
    fn test_parse_rejects_text() {
        assert!(parse_event_start("tomorrow", chrono_tz::UTC).is_none());
        assert!(parse_event_start("", chrono_tz::UTC).is_none());
    }
}
