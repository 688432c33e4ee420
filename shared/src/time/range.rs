//! Time-range construction.
//!
//! Builds the `{from_ts, to_ts}` epoch-millisecond pair a logs link carries,
//! either from two absolute instants or from an end instant and a duration.

use super::TimeError;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// An absolute time range as carried by a logs link.
///
/// Both bounds are epoch milliseconds rendered as decimal strings, the form
/// Datadog expects in the `from_ts` and `to_ts` query keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    /// Start of the range, epoch milliseconds.
    pub from_ts: String,
    /// End of the range, epoch milliseconds.
    pub to_ts: String,
}

/// Builds a time range from two absolute instants.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shared::time::build_time_range;
///
/// let start = Utc.with_ymd_and_hms(2024, 12, 6, 23, 20, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 12, 6, 23, 40, 0).unwrap();
/// let range = build_time_range(&start, &end);
///
/// assert_eq!(range.from_ts, "1733527200000");
/// assert_eq!(range.to_ts, "1733528400000");
/// ```
#[must_use]
pub fn build_time_range<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> TimeRange {
    TimeRange {
        from_ts: (start.timestamp() * 1000).to_string(),
        to_ts: (end.timestamp() * 1000).to_string(),
    }
}

/// Builds a time range ending at the given instant, starting `length` earlier.
///
/// `end_time` is parsed with the caller-supplied chrono `layout`; when absent
/// or empty the range ends now. The layout must carry an offset (`%z`-style)
/// so the instant is unambiguous.
///
/// # Errors
///
/// Returns [`TimeError::InvalidTimestamp`] if `end_time` is supplied but does
/// not match `layout`.
pub fn range_ending_at(
    end_time: Option<&str>,
    layout: &str,
    length: Duration,
) -> Result<TimeRange, TimeError> {
    let end = match end_time {
        Some(value) if !value.is_empty() => DateTime::parse_from_str(value, layout)
            .map_err(|source| TimeError::InvalidTimestamp {
                value: value.to_string(),
                layout: layout.to_string(),
                source,
            })?
            .with_timezone(&Utc),
        _ => Utc::now(),
    };

    let start = end - length;
    Ok(build_time_range(&start, &end))
}
