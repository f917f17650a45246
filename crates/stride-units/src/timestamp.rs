//! Wire-format timestamp parsing.
//!
//! The activity feed carries two timestamp shapes: activity start times in
//! local time with an explicit UTC offset (`2016-11-17T07:11:00-08:00`),
//! and profile-fact timestamps in naive UTC with fractional seconds
//! (`2016-11-17T15:11:00.123`).

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("malformed timestamp: {input:?}")]
    Malformed { input: String },

    #[error("malformed UTC offset in timestamp: {input:?}")]
    InvalidOffset { input: String },
}

/// Parse `YYYY-MM-DDTHH:MM:SS±HH:MM` into a timezone-aware instant.
///
/// The trailing six characters are the offset; offset seconds are
/// sign x (HH x 3600 + MM x 60), applied to the naive local timestamp.
pub fn parse_local(input: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    if !input.is_ascii() || input.len() < 25 {
        return Err(TimestampError::Malformed {
            input: input.to_string(),
        });
    }

    let (naive_part, offset_part) = input.split_at(input.len() - 6);
    let naive = NaiveDateTime::parse_from_str(naive_part, "%Y-%m-%dT%H:%M:%S").map_err(|_| {
        TimestampError::Malformed {
            input: input.to_string(),
        }
    })?;
    let offset = parse_offset(offset_part).ok_or_else(|| TimestampError::InvalidOffset {
        input: input.to_string(),
    })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| TimestampError::Malformed {
            input: input.to_string(),
        })
}

/// Parse `YYYY-MM-DDTHH:MM:SS.fff` as a UTC instant.
///
/// The fraction is optional on input; the instant is preserved rather
/// than relabelled into the host timezone.
pub fn parse_utc(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| {
        TimestampError::Malformed {
            input: input.to_string(),
        }
    })?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let bytes = s.as_bytes();
    let sign = match bytes.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    if bytes.get(3) != Some(&b':') {
        return None;
    }
    let hours: i32 = s.get(1..3)?.parse().ok()?;
    let minutes: i32 = s.get(4..6)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
