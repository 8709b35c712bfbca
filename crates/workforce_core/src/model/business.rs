//! Tenant root of the data model.

use serde::{Deserialize, Serialize};

/// A business identified by its globally unique tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub business_tag: String,
    pub business_name: String,
}

impl Business {
    pub fn new(business_tag: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            business_tag: business_tag.into(),
            business_name: business_name.into(),
        }
    }
}
