//! Inputs and outputs of ranked-range reporting queries.
//!
//! # Invariants
//! - `RankRange` is 1-based and inclusive at the API boundary.
//! - The store sees `LIMIT end - start + 1 OFFSET start - 1`.
//! - Worked time is summed as a float by the store and saturated into `i64`.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Slice `[start_range, end_range]` of a ranking, counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    start_range: u32,
    end_range: u32,
}

impl RankRange {
    pub fn new(start_range: u32, end_range: u32) -> Result<Self, ValidationError> {
        if start_range == 0 || end_range < start_range {
            return Err(ValidationError::InvalidRankRange {
                start_range,
                end_range,
            });
        }
        Ok(Self {
            start_range,
            end_range,
        })
    }

    /// Row count for the store's `LIMIT`.
    pub fn limit(&self) -> i64 {
        i64::from(self.end_range - self.start_range) + 1
    }

    /// Zero-based row skip for the store's `OFFSET`.
    pub fn offset(&self) -> i64 {
        i64::from(self.start_range) - 1
    }
}

/// Only work logs lying entirely inside `[start, end]` are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidTimeWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering every representable timestamp.
    pub fn unbounded() -> Self {
        Self {
            start: i64::MIN,
            end: i64::MAX,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

/// One entry of a ranked report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked<T> {
    pub item: T,
    /// Summed `end_time - start_time` over the counted work logs.
    pub worked_millis: i64,
}

/// Converts a store-side `TOTAL(...)` of milliseconds into an `i64`,
/// clamping at the type bounds.
pub(crate) fn worked_millis_from_total(total: f64) -> i64 {
    // Float to int `as` saturates at the bounds and maps NaN to 0.
    total as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rank_translates_to_one_row_at_zero() {
        let range = RankRange::new(1, 1).unwrap();
        assert_eq!(range.limit(), 1);
        assert_eq!(range.offset(), 0);
    }

    #[test]
    fn later_ranks_skip_earlier_rows() {
        let range = RankRange::new(3, 7).unwrap();
        assert_eq!(range.limit(), 5);
        assert_eq!(range.offset(), 2);
    }

    #[test]
    fn zero_or_inverted_ranges_are_rejected() {
        assert!(RankRange::new(0, 3).is_err());
        assert_eq!(
            RankRange::new(4, 2),
            Err(ValidationError::InvalidRankRange {
                start_range: 4,
                end_range: 2,
            })
        );
    }

    #[test]
    fn worked_totals_saturate_instead_of_overflowing() {
        assert_eq!(worked_millis_from_total(300.0), 300);
        assert_eq!(worked_millis_from_total(0.0), 0);
        assert_eq!(worked_millis_from_total(2.0 * i64::MAX as f64), i64::MAX);
        assert_eq!(worked_millis_from_total(f64::NAN), 0);
    }

    #[test]
    fn time_window_rejects_start_after_end() {
        assert!(TimeWindow::new(10, 10).is_ok());
        assert_eq!(
            TimeWindow::new(11, 10),
            Err(ValidationError::InvalidTimeWindow { start: 11, end: 10 })
        );
    }
}
