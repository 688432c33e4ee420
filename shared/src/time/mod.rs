//! Relative-time resolution and time-range construction.
//!
//! Datadog deep links carry their time bounds as epoch-millisecond strings in
//! the `from_ts`/`to_ts` query keys. This module resolves Grafana-style
//! relative expressions (`now`, `now-1h`) into that absolute form and builds
//! `{from_ts, to_ts}` pairs from instants or durations.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use shared::time::RelativeTimeResolver;
//!
//! let reference = Utc.with_ymd_and_hms(2024, 12, 6, 23, 40, 0).unwrap();
//! let resolver = RelativeTimeResolver::with_reference(reference);
//!
//! assert_eq!(resolver.resolve("now-20m").unwrap(), "1733527200000");
//! assert_eq!(resolver.resolve("1733527200000").unwrap(), "1733527200000");
//! ```

mod range;
mod relative;

pub use range::{build_time_range, range_ending_at, TimeRange};
pub use relative::{parse_duration, RelativeTimeResolver};

use thiserror::Error;

/// Errors that can occur while handling time expressions.
#[derive(Debug, Error)]
pub enum TimeError {
    /// A time expression contains the `now` marker but does not match the
    /// relative-time grammar.
    #[error("invalid relative time expression '{expression}': {reason}")]
    InvalidRelativeExpression {
        /// The offending expression.
        expression: String,
        /// Why the expression was rejected.
        reason: String,
    },

    /// An absolute timestamp string does not match the expected layout.
    #[error("invalid timestamp '{value}' for layout '{layout}'")]
    InvalidTimestamp {
        /// The offending timestamp string.
        value: String,
        /// The layout it was expected to match.
        layout: String,
        /// The underlying parse failure.
        #[source]
        source: chrono::format::ParseError,
    },

    /// A duration string does not match the `<amount><unit>` grammar.
    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration {
        /// The offending duration string.
        value: String,
        /// Why the duration was rejected.
        reason: String,
    },
}
