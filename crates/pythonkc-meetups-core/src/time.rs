//! Timestamp reconstruction from Meetup.com millisecond fields.
//!
//! Upstream reports an event's start as a UTC timestamp in milliseconds plus
//! a separate offset from UTC, also in milliseconds. The offset is applied as
//! a fixed offset with no daylight-saving rules of its own.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use tracing::warn;

/// Builds a timezone-aware datetime from a UTC millisecond timestamp.
///
/// Returns `None` when the timestamp is missing or zero: an epoch-zero start
/// time cannot be told apart from "no start time" and is treated as absent.
/// When a non-zero offset is given the same instant is expressed in that
/// fixed offset, otherwise it is expressed at `+00:00`.
pub fn parse_datetime(
    utc_timestamp_ms: Option<i64>,
    utc_offset_ms: Option<i64>,
) -> Option<DateTime<FixedOffset>> {
    let timestamp_ms = utc_timestamp_ms.filter(|ms| *ms != 0)?;

    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(timestamp_ms) else {
        warn!(timestamp_ms, "timestamp out of range, ignoring");
        return None;
    };

    let offset = match utc_offset_ms.filter(|ms| *ms != 0) {
        Some(offset_ms) => fixed_offset(offset_ms).unwrap_or_else(|| {
            warn!(offset_ms, "utc offset out of range, keeping UTC");
            utc_offset()
        }),
        None => utc_offset(),
    };

    Some(utc.with_timezone(&offset))
}

/// Converts a millisecond offset to a [`FixedOffset`], truncating to seconds.
///
/// Returns `None` if the offset is a day or more in either direction.
pub fn fixed_offset(offset_ms: i64) -> Option<FixedOffset> {
    let secs = i32::try_from(offset_ms / 1000).ok()?;
    FixedOffset::east_opt(secs)
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_timestamp_is_absent() {
        assert!(parse_datetime(None, None).is_none());
        assert!(parse_datetime(None, Some(3_600_000)).is_none());
    }

    #[test]
    fn zero_timestamp_is_indistinguishable_from_missing() {
        // Epoch zero is a legitimate instant, but upstream uses 0 for "unset".
        assert!(parse_datetime(Some(0), None).is_none());
        assert!(parse_datetime(Some(0), Some(3_600_000)).is_none());
    }

    #[test]
    fn timestamp_without_offset_is_utc() {
        let dt = parse_datetime(Some(1_000), None).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt, Utc.timestamp_opt(1, 0).unwrap());
    }

    #[test]
    fn zero_offset_is_treated_as_utc() {
        let dt = parse_datetime(Some(1_000), Some(0)).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn offset_re_expresses_same_instant() {
        let dt = parse_datetime(Some(1_000), Some(3_600_000)).unwrap();

        assert_eq!(dt.offset().local_minus_utc(), 3600);
        assert_eq!(dt, Utc.timestamp_opt(1, 0).unwrap());
        assert_eq!(dt.to_rfc3339(), "1970-01-01T01:00:01+01:00");
    }

    #[test]
    fn negative_offset() {
        // 2012-05-10T23:00:00Z at Central Daylight Time.
        let dt = parse_datetime(Some(1_336_690_800_000), Some(-18_000_000)).unwrap();
        assert_eq!(dt.to_rfc3339(), "2012-05-10T18:00:00-05:00");
    }

    #[test]
    fn millisecond_precision_is_kept() {
        let dt = parse_datetime(Some(1_500), None).unwrap();
        assert_eq!(dt.timestamp_millis(), 1_500);
    }

    #[test]
    fn out_of_range_offset_keeps_utc() {
        let dt = parse_datetime(Some(1_000), Some(90_000_000)).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn out_of_range_timestamp_is_absent() {
        assert!(parse_datetime(Some(i64::MAX), None).is_none());
    }

    #[test]
    fn fixed_offset_truncates_to_seconds() {
        assert_eq!(fixed_offset(3_600_999).unwrap().local_minus_utc(), 3600);
        assert!(fixed_offset(86_400_000).is_none());
    }
}
