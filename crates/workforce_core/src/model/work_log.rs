//! Time-tracked unit of work performed by an employee for a client.

use super::client::ClientId;
use super::location::Location;
use super::validation::{require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Surrogate key of a `WorkLog` row.
pub type WorkLogId = i64;

/// A work log covering `[start_time, end_time)` in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLog {
    /// Assigned by the store on insert.
    pub work_log_id: Option<WorkLogId>,
    pub user_name: String,
    pub business_tag: String,
    pub client_id: ClientId,
    pub start_time: i64,
    pub end_time: i64,
    pub description: String,
    /// At most one location is attached in practice.
    pub location: Option<Location>,
}

impl WorkLog {
    pub fn new(
        user_name: impl Into<String>,
        business_tag: impl Into<String>,
        client_id: ClientId,
        start_time: i64,
        end_time: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            work_log_id: None,
            user_name: user_name.into(),
            business_tag: business_tag.into(),
            client_id,
            start_time,
            end_time,
            description: description.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Worked duration in milliseconds, `None` when it does not fit in `i64`.
    pub fn duration_millis(&self) -> Option<i64> {
        self.end_time.checked_sub(self.start_time)
    }

    /// Checks the invariants that must hold before any write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_time >= self.end_time {
            return Err(ValidationError::InvalidTimeRange {
                start_time: self.start_time,
                end_time: self.end_time,
            });
        }
        if self.duration_millis().is_none() {
            return Err(ValidationError::DurationOverflow {
                start_time: self.start_time,
                end_time: self.end_time,
            });
        }
        require_non_empty("userName", &self.user_name)?;
        require_non_empty("businessTag", &self.business_tag)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_and_inverted_ranges() {
        let empty = WorkLog::new("ada", "acme", 1, 100, 100, "zero length");
        assert_eq!(
            empty.validate(),
            Err(ValidationError::InvalidTimeRange {
                start_time: 100,
                end_time: 100,
            })
        );

        let inverted = WorkLog::new("ada", "acme", 1, 200, 100, "backwards");
        assert!(matches!(
            inverted.validate(),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn validate_accepts_forward_range() {
        let log = WorkLog::new("ada", "acme", 1, 100, 160, "site visit");
        assert_eq!(log.validate(), Ok(()));
        assert_eq!(log.duration_millis(), Some(60));
    }

    #[test]
    fn validate_rejects_durations_beyond_i64() {
        let huge = WorkLog::new("ada", "acme", 1, i64::MIN, i64::MAX, "forever");
        assert_eq!(huge.duration_millis(), None);
        assert_eq!(
            huge.validate(),
            Err(ValidationError::DurationOverflow {
                start_time: i64::MIN,
                end_time: i64::MAX,
            })
        );

        let widest = WorkLog::new("ada", "acme", 1, -1, i64::MAX, "edge");
        assert_eq!(widest.duration_millis(), Some(i64::MAX));
        assert_eq!(widest.validate(), Ok(()));
    }
}
