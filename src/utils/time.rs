use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::model::attendance::Timestamp;

/// Naive layouts accepted from rows that were written without an offset.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Source of "now" for request handlers, sampled once per request.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System(FixedOffset),
    #[cfg(test)]
    Fixed(Timestamp),
}

impl Clock {
    pub fn now(&self) -> Timestamp {
        match self {
            Clock::System(offset) => Utc::now().with_timezone(offset),
            #[cfg(test)]
            Clock::Fixed(ts) => *ts,
        }
    }
}

/// Stored form: RFC 3339 with explicit offset.
pub fn to_stored(ts: &Timestamp) -> String {
    ts.to_rfc3339()
}

/// Parses a stored timestamp. Offset-qualified values keep their own offset;
/// naive values are read as wall-clock time in `offset`.
pub fn parse_stored(raw: &str, offset: FixedOffset) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

pub fn to_display(ts: &Timestamp, offset: FixedOffset) -> String {
    ts.with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn format_duration(d: Duration) -> String {
    let mins = d.num_minutes();
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Accepts `±HH:MM`, `UTC`/`Z` and the usual names for IST.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    match raw {
        "UTC" | "Z" => return FixedOffset::east_opt(0),
        "IST" | "Asia/Kolkata" | "Asia/Calcutta" => return FixedOffset::east_opt(19_800),
        _ => {}
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (h, m) = rest.split_once(':')?;
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (h * 3600 + m * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(19_800).unwrap()
    }

    #[test]
    fn stored_values_carry_offset() {
        let ts = ist().with_ymd_and_hms(2024, 7, 1, 10, 5, 0).unwrap();
        let raw = to_stored(&ts);
        assert_eq!(raw, "2024-07-01T10:05:00+05:30");
        assert_eq!(parse_stored(&raw, FixedOffset::east_opt(0).unwrap()), Some(ts));
    }

    #[test]
    fn reads_fractional_and_naive_rows() {
        let expected = ist().with_ymd_and_hms(2024, 7, 1, 10, 5, 0).unwrap()
            + Duration::microseconds(123_456);
        assert_eq!(
            parse_stored("2024-07-01T10:05:00.123456+05:30", ist()),
            Some(expected)
        );
        assert_eq!(
            parse_stored("2024-07-01T10:05:00.123456", ist()),
            Some(expected)
        );
        assert_eq!(parse_stored("yesterday", ist()), None);
    }

    #[test]
    fn display_converts_to_civil_offset() {
        let utc = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 1, 4, 35, 0)
            .unwrap();
        assert_eq!(to_display(&utc, ist()), "2024-07-01 10:05:00");
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_offset("+05:30"), Some(ist()));
        assert_eq!(parse_offset("Asia/Kolkata"), Some(ist()));
        assert_eq!(parse_offset("-04:00"), FixedOffset::west_opt(4 * 3600));
        assert_eq!(parse_offset("05:30"), None);
        assert_eq!(parse_offset("+25:00"), None);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(Duration::minutes(485)), "08:05");
        assert_eq!(format_duration(Duration::minutes(-5)), "-00:05");
    }
}
