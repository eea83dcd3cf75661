//! Wire format for instants crossing the API boundary:
//! `yyyy-MM-ddTHH:mm:ss.SSSX`, e.g. `2021-03-04T10:15:30.123Z`.
//!
//! Parsing accepts `Z`, `+HH`, `+HHmm` and `+HH:mm` offsets. Formatting
//! always renders UTC with a `Z` suffix.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use thiserror::Error;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// `yyyy-MM-ddTHH:mm:ss.SSS`
const LOCAL_PART_LEN: usize = 23;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp '{0}' has no timezone offset")]
    MissingOffset(String),

    #[error("timestamp '{0}' has an invalid timezone offset")]
    InvalidOffset(String),

    #[error("timestamp '{0}' does not match yyyy-MM-ddTHH:mm:ss.SSSX")]
    Malformed(String),

    #[error("epoch millis {0} are out of range")]
    OutOfRange(i64),
}

pub fn parse(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let (local, offset) = split_offset(input)?;

    // Exactly three fraction digits.
    let fraction_ok = local.len() == LOCAL_PART_LEN
        && local.as_bytes()[19] == b'.'
        && local.as_bytes()[20..].iter().all(u8::is_ascii_digit);
    if !fraction_ok {
        return Err(TimestampError::Malformed(input.to_string()));
    }

    let naive = NaiveDateTime::parse_from_str(local, DATE_TIME_FORMAT)
        .map_err(|_| TimestampError::Malformed(input.to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimestampError::Malformed(input.to_string()))
}

pub fn format(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub fn to_millis(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

pub fn from_millis(millis: i64) -> Result<DateTime<Utc>, TimestampError> {
    DateTime::from_timestamp_millis(millis).ok_or(TimestampError::OutOfRange(millis))
}

/// Split `input` into the local date-time part and its offset.
fn split_offset(input: &str) -> Result<(&str, FixedOffset), TimestampError> {
    if let Some(local) = input.strip_suffix('Z') {
        return Ok((local, Utc.fix()));
    }

    // The offset sign can only appear after the time separator, dates use '-' too.
    let time_start = input
        .find('T')
        .ok_or_else(|| TimestampError::Malformed(input.to_string()))?;
    let sign_idx = input[time_start..]
        .rfind(['+', '-'])
        .map(|i| time_start + i)
        .ok_or_else(|| TimestampError::MissingOffset(input.to_string()))?;

    let (local, raw_offset) = input.split_at(sign_idx);
    let sign = if raw_offset.starts_with('-') { -1 } else { 1 };

    let invalid = || TimestampError::InvalidOffset(input.to_string());
    // `HH`, `HHmm` or `HH:mm`; anything else, including a stray colon, is rejected.
    let body = &raw_offset[1..];
    let shape_ok = body.bytes().enumerate().all(|(i, b)| {
        b.is_ascii_digit() || (b == b':' && i == 2 && body.len() == 5)
    });
    let (hh, mm) = match body.len() {
        2 if shape_ok => (body, "00"),
        4 if shape_ok => (&body[..2], &body[2..]),
        5 if shape_ok => (&body[..2], &body[3..]),
        _ => return Err(invalid()),
    };
    let hours: i32 = hh.parse().map_err(|_| invalid())?;
    let minutes: i32 = mm.parse().map_err(|_| invalid())?;
    if hours > 18 || minutes > 59 {
        return Err(invalid());
    }

    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)?;
    Ok((local, offset))
}

/// Serde adapter rendering `DateTime<Utc>` in the wire format.
pub mod wire {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(instant))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            instant: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match instant {
                Some(instant) => serializer.serialize_str(&crate::timestamp::format(instant)),
                None => serializer.serialize_none(),
            }
        }
    }
}
