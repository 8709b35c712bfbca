//! Physical location attached to clients and work logs through a
//! location owner.

use serde::{Deserialize, Serialize};

/// Surrogate key of a `Location` row.
pub type LocationId = i64;

/// Surrogate key of a `LocationOwner` anchor row.
pub type LocationOwnerId = i64;

/// A location carries no reference to whoever owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub post_code: String,
    pub description: String,
}

impl Location {
    pub fn new(post_code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            post_code: post_code.into(),
            description: description.into(),
        }
    }
}
