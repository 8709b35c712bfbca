//! Invariant violations detectable before any store interaction.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-supplied data that can never be persisted as given.
///
/// Raised before a write begins, so rejecting it has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A work log must end strictly after it starts.
    InvalidTimeRange { start_time: i64, end_time: i64 },
    /// `end_time - start_time` does not fit in an `i64` of milliseconds.
    DurationOverflow { start_time: i64, end_time: i64 },
    /// Ranked reports take a 1-based inclusive `[start_range, end_range]`.
    InvalidRankRange { start_range: u32, end_range: u32 },
    InvalidTimeWindow { start: i64, end: i64 },
    /// The bootstrap employee must belong to the business being created.
    BusinessTagMismatch { expected: String, actual: String },
    EmptyField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeRange {
                start_time,
                end_time,
            } => write!(
                f,
                "start time {start_time} must be earlier than end time {end_time}"
            ),
            Self::DurationOverflow {
                start_time,
                end_time,
            } => write!(
                f,
                "duration from {start_time} to {end_time} overflows 64-bit milliseconds"
            ),
            Self::InvalidRankRange {
                start_range,
                end_range,
            } => write!(
                f,
                "rank range [{start_range}, {end_range}] must satisfy 1 <= start <= end"
            ),
            Self::InvalidTimeWindow { start, end } => {
                write!(f, "time window start {start} is after end {end}")
            }
            Self::BusinessTagMismatch { expected, actual } => write!(
                f,
                "business tag `{actual}` does not match business `{expected}`"
            ),
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank values for fields that form part of a key.
pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
