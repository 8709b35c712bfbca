//! Customer of a business, owning a set of locations.

use super::location::Location;
use super::validation::{require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Surrogate key of a `Client` row.
pub type ClientId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Assigned by the store on insert.
    pub client_id: Option<ClientId>,
    pub client_name: String,
    pub business_tag: String,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl Client {
    pub fn new(client_name: impl Into<String>, business_tag: impl Into<String>) -> Self {
        Self {
            client_id: None,
            client_name: client_name.into(),
            business_tag: business_tag.into(),
            locations: Vec::new(),
        }
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("clientName", &self.client_name)?;
        require_non_empty("businessTag", &self.business_tag)
    }
}
