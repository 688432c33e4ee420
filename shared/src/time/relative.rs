//! Relative-time expression resolver.
//!
//! Resolves expressions like:
//! - `now`
//! - `now-1h`
//! - `now+15m`
//!
//! Expressions without the `now` marker pass through unchanged; everything
//! else is rendered as epoch milliseconds, Datadog's absolute-time convention.

use super::TimeError;
use chrono::{DateTime, Duration, Months, Utc};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, one_of};
use nom::combinator::{map_res, opt, value};
use nom::{IResult, Parser};

/// Resolves relative-time expressions against a reference clock.
///
/// The resolver is constructed once and injected wherever relative times need
/// resolving; it is read-only after construction. The production resolver
/// reads the system clock, while tests can pin the reference instant.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shared::time::RelativeTimeResolver;
///
/// let reference = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
/// let resolver = RelativeTimeResolver::with_reference(reference);
/// let one_hour_ago = resolver.resolve("now-1h").unwrap();
///
/// assert_eq!(one_hour_ago, ((reference.timestamp() - 3600) * 1000).to_string());
/// ```
#[derive(Debug, Clone)]
pub struct RelativeTimeResolver {
    reference: Option<DateTime<Utc>>,
}

impl RelativeTimeResolver {
    /// Creates a resolver that reads the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self { reference: None }
    }

    /// Creates a resolver pinned to a fixed reference instant.
    #[must_use]
    pub fn with_reference(reference: DateTime<Utc>) -> Self {
        Self {
            reference: Some(reference),
        }
    }

    /// Resolves a time expression to an absolute representation.
    ///
    /// Expressions that do not contain the `now` marker are returned
    /// unchanged, treated as already absolute. Expressions with the marker
    /// are parsed as `now` plus an optional signed offset and rendered as
    /// epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidRelativeExpression`] if the expression
    /// contains the marker but does not match the grammar, or if the offset
    /// falls outside the representable time range.
    pub fn resolve(&self, expression: &str) -> Result<String, TimeError> {
        if !expression.contains("now") {
            return Ok(expression.to_string());
        }

        let offset = parse_relative_expression(expression)?;
        let reference = self.now();
        let resolved = match offset {
            Some(offset) => {
                offset
                    .apply(reference)
                    .ok_or_else(|| TimeError::InvalidRelativeExpression {
                        expression: expression.to_string(),
                        reason: "offset out of range".to_string(),
                    })?
            }
            None => reference,
        };

        Ok((resolved.timestamp() * 1000).to_string())
    }

    fn now(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(Utc::now)
    }
}

impl Default for RelativeTimeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a `24h`-style duration string.
///
/// Supported units are `s`, `m`, `h`, `d` and `w`; calendar units have no
/// fixed length and are not valid in a duration.
///
/// # Errors
///
/// Returns [`TimeError::InvalidDuration`] if the string does not match the
/// `<amount><unit>` grammar or the duration is out of range.
///
/// # Examples
///
/// ```
/// use shared::time::parse_duration;
///
/// assert_eq!(parse_duration("24h").unwrap(), chrono::Duration::hours(24));
/// assert!(parse_duration("three days").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, TimeError> {
    let (amount, unit) = match duration_expression(input) {
        Ok(("", parts)) => parts,
        Ok((rest, _)) => {
            return Err(TimeError::InvalidDuration {
                value: input.to_string(),
                reason: format!("unexpected trailing content '{rest}'"),
            })
        }
        Err(err) => {
            return Err(TimeError::InvalidDuration {
                value: input.to_string(),
                reason: err.to_string(),
            })
        }
    };

    let duration = match unit {
        's' => Duration::try_seconds(amount),
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => None,
    };

    duration.ok_or_else(|| TimeError::InvalidDuration {
        value: input.to_string(),
        reason: "duration out of range".to_string(),
    })
}

// ============================================================================
// Grammar
// ============================================================================

/// Units accepted in a relative-time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

/// A signed offset from the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RelativeOffset {
    amount: i64,
    unit: OffsetUnit,
}

impl RelativeOffset {
    fn apply(self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.unit {
            OffsetUnit::Seconds => Duration::try_seconds(self.amount),
            OffsetUnit::Minutes => Duration::try_minutes(self.amount),
            OffsetUnit::Hours => Duration::try_hours(self.amount),
            OffsetUnit::Days => Duration::try_days(self.amount),
            OffsetUnit::Weeks => Duration::try_weeks(self.amount),
            OffsetUnit::Months => return add_months(reference, self.amount),
            OffsetUnit::Years => return add_months(reference, self.amount.checked_mul(12)?),
        }
        .and_then(|delta| reference.checked_add_signed(delta))
    }
}

fn add_months(reference: DateTime<Utc>, amount: i64) -> Option<DateTime<Utc>> {
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    if amount >= 0 {
        reference.checked_add_months(months)
    } else {
        reference.checked_sub_months(months)
    }
}

fn parse_relative_expression(expression: &str) -> Result<Option<RelativeOffset>, TimeError> {
    match relative_expression(expression) {
        Ok(("", offset)) => Ok(offset),
        Ok((rest, _)) => Err(TimeError::InvalidRelativeExpression {
            expression: expression.to_string(),
            reason: format!("unexpected trailing content '{rest}'"),
        }),
        Err(err) => Err(TimeError::InvalidRelativeExpression {
            expression: expression.to_string(),
            reason: err.to_string(),
        }),
    }
}

fn relative_expression(input: &str) -> IResult<&str, Option<RelativeOffset>> {
    let (input, _) = tag("now").parse(input)?;
    let (input, offset) = opt((
        one_of("+-"),
        map_res(digit1, str::parse::<i64>),
        offset_unit,
    ))
    .parse(input)?;

    Ok((
        input,
        offset.map(|(sign, amount, unit)| RelativeOffset {
            amount: if sign == '-' { -amount } else { amount },
            unit,
        }),
    ))
}

fn offset_unit(input: &str) -> IResult<&str, OffsetUnit> {
    alt((
        value(OffsetUnit::Seconds, char('s')),
        value(OffsetUnit::Minutes, char('m')),
        value(OffsetUnit::Hours, char('h')),
        value(OffsetUnit::Days, char('d')),
        value(OffsetUnit::Weeks, char('w')),
        value(OffsetUnit::Months, char('M')),
        value(OffsetUnit::Years, char('y')),
    ))
    .parse(input)
}

fn duration_expression(input: &str) -> IResult<&str, (i64, char)> {
    (map_res(digit1, str::parse::<i64>), one_of("smhdw")).parse(input)
}

// ============================================================================
// Tests
// ============================================================================
